//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → catalog → HTTP requests →
//! validated, stamped records and the run report

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tap_openweathermap::config::TapConfig;
use tap_openweathermap::engine::{RunStatus, StreamStatus, SyncEngine, SyncReport};
use tap_openweathermap::enrich::RunContext;
use tap_openweathermap::error::FailureCause;
use tap_openweathermap::http::HttpClient;
use tap_openweathermap::output::{JsonLinesSink, MemorySink, RecordSink};
use tap_openweathermap::schema::weather_registry;
use tap_openweathermap::streams::{
    StreamCatalog, CURRENT_WEATHER_STREAM, FORECAST_STREAM, FREE_FORECAST_STREAM,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

/// Config pointed at the mock server, without retries or rate limiting
fn config_for(server: &MockServer, overrides: Value) -> TapConfig {
    let mut base = json!({
        "api_key": "test-key",
        "current_weather_city_name": "London,uk",
        "forecast_weather_lattitude": "51.51",
        "forecast_weather_longitude": "-0.13",
        "base_url": server.uri(),
        "http": {"max_retries": 0, "calls_per_minute": 0}
    });
    if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            if value.is_null() {
                base.remove(key);
            } else {
                base.insert(key.clone(), value.clone());
            }
        }
    }
    TapConfig::from_json(&base.to_string()).unwrap()
}

async fn sync_with(
    config: TapConfig,
    sink: Arc<dyn RecordSink>,
    cancel: CancellationToken,
) -> SyncReport {
    let catalog =
        StreamCatalog::builtin(&weather_registry().unwrap(), config.base_url.as_deref()).unwrap();
    let transport = Arc::new(HttpClient::with_config(config.http_client_config()).unwrap());
    let ctx = Arc::new(RunContext::with_synced_at(
        config,
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    ));

    SyncEngine::new(transport)
        .sync(&catalog, ctx, sink, cancel)
        .await
        .unwrap()
}

fn forecast_items(range: std::ops::Range<u64>) -> Vec<Value> {
    range
        .map(|i| {
            json!({
                "dt": 1_709_294_400 + i * 10_800,
                "main": {"temp": 281.0 + i as f64, "humidity": 80},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
                "dt_txt": "2024-03-01 12:00:00"
            })
        })
        .collect()
}

// ============================================================================
// Current Weather
// ============================================================================

#[tokio::test]
async fn test_current_weather_coerces_and_stamps_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London,uk"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": {"temp": "280.5"},
            "weather": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, json!({"streams": [CURRENT_WEATHER_STREAM]}));
    let sink = Arc::new(MemorySink::new());
    let report = sync_with(config, sink.clone(), CancellationToken::new()).await;

    assert_eq!(report.status, RunStatus::Succeeded);
    let records = sink.records_for(CURRENT_WEATHER_STREAM).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("main"), Some(&json!({"temp": 280.5})));
    assert_eq!(records[0].get("weather"), Some(&json!([])));
    assert_eq!(records[0].synced_at(), Some("2024-03-01T12:00:00Z"));
}

#[tokio::test]
async fn test_units_and_lang_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": {"temp": 7.2},
            "name": "London"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        json!({"streams": [CURRENT_WEATHER_STREAM], "units": "metric", "lang": "de"}),
    );
    let sink = Arc::new(MemorySink::new());
    let report = sync_with(config, sink.clone(), CancellationToken::new()).await;

    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(sink.len().await, 1);
}

#[tokio::test]
async fn test_missing_required_field_drops_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"main": {}})))
        .mount(&server)
        .await;

    let config = config_for(&server, json!({"streams": [CURRENT_WEATHER_STREAM]}));
    let sink = Arc::new(MemorySink::new());
    let report = sync_with(config, sink.clone(), CancellationToken::new()).await;

    let stream = report.stream(CURRENT_WEATHER_STREAM).unwrap();
    assert_eq!(stream.records_emitted, 0);
    assert_eq!(stream.records_dropped, 1);
    assert_eq!(
        stream.failures.get(&FailureCause::RequiredFieldMissing),
        Some(&1)
    );
    assert_eq!(stream.status, StreamStatus::Failed);
    assert!(sink.is_empty().await);
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_free_forecast_follows_seen_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "51.51"))
        .and(query_param("lon", "-0.13"))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cod": "200",
            "message": 0,
            "cnt": 40,
            "list": forecast_items(0..20),
            "city": {"id": 2643743, "name": "London", "country": "GB"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("start", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cod": "200",
            "message": 0,
            "cnt": 40,
            "list": forecast_items(20..40),
            "city": {"id": 2643743, "name": "London", "country": "GB"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, json!({"streams": [FREE_FORECAST_STREAM]}));
    let sink = Arc::new(MemorySink::new());
    let report = sync_with(config, sink.clone(), CancellationToken::new()).await;

    let stream = report.stream(FREE_FORECAST_STREAM).unwrap();
    assert_eq!(stream.status, StreamStatus::Completed);
    assert_eq!(stream.pages_fetched, 2);

    let pages = sink.records_for(FREE_FORECAST_STREAM).await;
    assert_eq!(pages.len(), 2);
    let items: usize = pages
        .iter()
        .filter_map(|p| p.get("list").and_then(Value::as_array))
        .map(Vec::len)
        .sum();
    assert_eq!(items, 40);
    assert_eq!(pages[1].get("list").unwrap()[0]["dt"], json!(1_709_294_400 + 20 * 10_800));
}

// ============================================================================
// Failure Isolation
// ============================================================================

#[tokio::test]
async fn test_missing_coordinate_fails_only_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": {"temp": 280.32},
            "name": "London"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/onecall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        json!({
            "streams": [CURRENT_WEATHER_STREAM, FORECAST_STREAM],
            "forecast_weather_lattitude": null
        }),
    );
    let sink = Arc::new(MemorySink::new());
    let report = sync_with(config, sink.clone(), CancellationToken::new()).await;

    assert_eq!(report.status, RunStatus::Partial);
    assert_eq!(
        report.stream(CURRENT_WEATHER_STREAM).unwrap().status,
        StreamStatus::Completed
    );

    let forecast = report.stream(FORECAST_STREAM).unwrap();
    assert_eq!(forecast.status, StreamStatus::Failed);
    assert_eq!(forecast.failures.get(&FailureCause::MissingConfig), Some(&1));
    assert!(forecast
        .error
        .as_deref()
        .is_some_and(|e| e.contains("forecast_weather_lattitude")));

    assert_eq!(sink.records_for(CURRENT_WEATHER_STREAM).await.len(), 1);
}

#[tokio::test]
async fn test_error_status_fails_stream_with_transport_cause() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let config = config_for(&server, json!({"streams": [CURRENT_WEATHER_STREAM]}));
    let report = sync_with(config, Arc::new(MemorySink::new()), CancellationToken::new()).await;

    let stream = report.stream(CURRENT_WEATHER_STREAM).unwrap();
    assert_eq!(stream.status, StreamStatus::Failed);
    assert_eq!(stream.failures.get(&FailureCause::Transport), Some(&1));
    assert_eq!(report.status, RunStatus::Failed);
}

#[tokio::test]
async fn test_refused_connection_keeps_api_key_out_of_report() {
    let server = MockServer::start().await;
    let config = config_for(
        &server,
        json!({
            "api_key": "SUPERSECRETKEY",
            "base_url": "http://127.0.0.1:1",
            "streams": [CURRENT_WEATHER_STREAM]
        }),
    );
    let report = sync_with(config, Arc::new(MemorySink::new()), CancellationToken::new()).await;

    let stream = report.stream(CURRENT_WEATHER_STREAM).unwrap();
    assert_eq!(stream.status, StreamStatus::Failed);
    assert_eq!(stream.failures.get(&FailureCause::Transport), Some(&1));
    let error = stream.error.as_deref().unwrap();
    assert!(!error.contains("SUPERSECRETKEY"), "key leaked: {error}");

    let summary = serde_json::to_string(&report).unwrap();
    assert!(!summary.contains("SUPERSECRETKEY"));
}

// ============================================================================
// Cancellation and Summary
// ============================================================================

#[tokio::test]
async fn test_cancelled_run_issues_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let config = config_for(&server, json!({}));
    let report = sync_with(config, Arc::new(MemorySink::new()), cancel).await;

    assert_eq!(report.streams.len(), 3);
    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.failures().get(&FailureCause::Cancelled), Some(&3));
    assert!(report.streams.iter().all(|s| s.pages_fetched == 0));
}

#[tokio::test]
async fn test_summary_serializes_with_statuses_and_causes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"main": {"temp": 1.5}})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/onecall"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        json!({"streams": [CURRENT_WEATHER_STREAM, FORECAST_STREAM]}),
    );
    let report = sync_with(config, Arc::new(MemorySink::new()), CancellationToken::new()).await;
    let summary = serde_json::to_value(&report).unwrap();

    assert_eq!(summary["status"], "PARTIAL");
    assert_eq!(summary["synced_at"], "2024-03-01T12:00:00Z");
    assert_eq!(summary["streams"][0]["stream"], CURRENT_WEATHER_STREAM);
    assert_eq!(summary["streams"][0]["status"], "completed");
    assert_eq!(summary["streams"][1]["status"], "failed");
    assert_eq!(summary["streams"][1]["failures"]["decode"], 1);
}

// ============================================================================
// Singer Output
// ============================================================================

#[tokio::test]
async fn test_json_lines_output_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": {"temp": 280.32},
            "name": "London",
            "unexpected": true
        })))
        .mount(&server)
        .await;

    let config = config_for(&server, json!({"streams": [CURRENT_WEATHER_STREAM]}));
    let catalog =
        StreamCatalog::builtin(&weather_registry().unwrap(), config.base_url.as_deref()).unwrap();

    let sink = Arc::new(JsonLinesSink::new(Vec::new()));
    sink.write_schema(catalog.get(CURRENT_WEATHER_STREAM).unwrap())
        .await
        .unwrap();

    let report = sync_with(config, sink.clone(), CancellationToken::new()).await;
    assert_eq!(report.status, RunStatus::Succeeded);

    let Ok(sink) = Arc::try_unwrap(sink) else {
        panic!("sink still shared after the run");
    };
    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["type"], "SCHEMA");
    assert_eq!(lines[0]["stream"], CURRENT_WEATHER_STREAM);
    assert_eq!(lines[0]["schema"]["type"], json!(["object", "null"]));
    assert!(lines[0]["schema"]["properties"]["main"].is_object());
    assert_eq!(lines[1]["type"], "RECORD");
    assert_eq!(
        lines[1]["record"],
        json!({
            "main": {"temp": 280.32},
            "name": "London",
            "synced_at": "2024-03-01T12:00:00Z"
        })
    );
}
