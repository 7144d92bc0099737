//! Tests for the record extractor

use super::*;
use crate::error::Error;
use serde_json::json;

#[test]
fn test_root_object_is_single_record() {
    let extractor = RecordExtractor::new("$");
    let records = extractor
        .extract_body(r#"{"name": "London", "main": {"temp": 280.5}}"#)
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "London");
}

#[test]
fn test_root_array_yields_each_element() {
    for path in ["$", "$[*]", "$.[*]", ""] {
        let extractor = RecordExtractor::new(path);
        let records = extractor.extract(&json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})], "path {path:?}");
    }
}

#[test]
fn test_nested_path_array() {
    let body = json!({
        "cnt": 2,
        "list": [{"dt": 1}, {"dt": 2}],
        "city": {"name": "London"}
    });

    let records = RecordExtractor::new("$.list").extract(&body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["dt"], 2);

    let records = RecordExtractor::new("city").extract(&body).unwrap();
    assert_eq!(records, vec![json!({"name": "London"})]);
}

#[test]
fn test_wildcard_path_uses_jsonpath() {
    let body = json!({"list": [{"dt": 1}, {"dt": 2}, {"dt": 3}]});
    let records = RecordExtractor::new("$.list[*]").extract(&body).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2]["dt"], 3);
}

#[test]
fn test_path_matching_nothing_is_empty() {
    let body = json!({"list": []});

    assert!(RecordExtractor::new("$.missing").extract(&body).unwrap().is_empty());
    assert!(RecordExtractor::new("$.list").extract(&body).unwrap().is_empty());
    assert!(RecordExtractor::new("$.list.inner").extract(&body).unwrap().is_empty());
}

#[test]
fn test_null_node_is_empty() {
    let body = json!({"minutely": null});
    assert!(RecordExtractor::new("$.minutely").extract(&body).unwrap().is_empty());
}

#[test]
fn test_invalid_body_is_decode_error() {
    let err = RecordExtractor::new("$").extract_body("<html>502</html>").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_lookup_paths() {
    let body = json!({
        "cnt": 40,
        "list": [{"dt": 10}, {"dt": 20}, {"dt": 30}],
        "city": {"coord": {"lat": 51.5}}
    });

    assert_eq!(lookup(&body, "cnt"), Some(&json!(40)));
    assert_eq!(lookup(&body, "$.cnt"), Some(&json!(40)));
    assert_eq!(lookup(&body, "$.city.coord.lat"), Some(&json!(51.5)));
    assert_eq!(lookup(&body, "list[0].dt"), Some(&json!(10)));
    assert_eq!(lookup(&body, "list[-1].dt"), Some(&json!(30)));
    assert_eq!(lookup(&body, "list[-4]"), None);
    assert_eq!(lookup(&body, "list[7]"), None);
    assert_eq!(lookup(&body, "city.missing"), None);
    assert_eq!(lookup(&body, "$"), Some(&body));
}
