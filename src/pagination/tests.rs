//! Tests for pagination module

use super::*;
use serde_json::json;

fn forecast_config() -> PaginationConfig {
    PaginationConfig::seen_count("cnt", "list", "start")
}

fn forecast_page(cnt: u64, items: usize) -> serde_json::Value {
    let list: Vec<_> = (0..items).map(|i| json!({"dt": i})).collect();
    json!({"cod": "200", "cnt": cnt, "list": list})
}

// ============================================================================
// PageCursor Tests
// ============================================================================

#[test]
fn test_page_cursor_with_param() {
    let cursor = PageCursor::with_param("start", "20");
    assert!(!cursor.is_empty());
    assert_eq!(cursor.params().get("start"), Some(&"20".to_string()));
    assert!(PageCursor::new().is_empty());
}

// ============================================================================
// Seen-Count Tests
// ============================================================================

#[test]
fn test_seen_count_continues_until_total_reached() {
    let mut driver = PaginationDriver::new(true, &forecast_config());
    assert_eq!(driver.phase(), PaginationPhase::Init);
    assert!(driver.cursor().is_none());

    let phase = driver.advance(&forecast_page(40, 20), 1);
    assert_eq!(phase, PaginationPhase::HasMore);
    assert_eq!(driver.cursor(), Some(&PageCursor::with_param("start", "20")));

    let phase = driver.advance(&forecast_page(40, 20), 1);
    assert_eq!(phase, PaginationPhase::Done);
    assert!(driver.cursor().is_none());
    assert_eq!(driver.pages(), 2);
    assert_eq!(driver.records_seen(), 2);
}

#[test]
fn test_seen_count_full_first_page_is_done() {
    let mut driver = PaginationDriver::new(true, &forecast_config());
    assert_eq!(driver.advance(&forecast_page(40, 40), 1), PaginationPhase::Done);
}

#[test]
fn test_seen_count_empty_page_is_done() {
    let mut driver = PaginationDriver::new(true, &forecast_config());
    assert_eq!(driver.advance(&forecast_page(40, 0), 1), PaginationPhase::Done);
}

#[test]
fn test_seen_count_accepts_text_total() {
    let paginator = SeenCountPaginator::new("cnt", "list", "start");
    let mut state = PaginationState::new();
    let body = json!({"cnt": "3", "list": [1]});

    let cursor = paginator.next_cursor(&body, 1, &mut state);
    assert_eq!(cursor, Some(PageCursor::with_param("start", "1")));
    assert_eq!(state.items_seen, 1);
}

#[test]
fn test_seen_count_malformed_signal_is_done() {
    let paginator = SeenCountPaginator::new("cnt", "list", "start");

    for body in [
        json!({"list": [1, 2]}),
        json!({"cnt": "many", "list": [1, 2]}),
        json!({"cnt": 10, "list": {"dt": 1}}),
        json!({"cnt": -5, "list": [1]}),
    ] {
        let mut state = PaginationState::new();
        assert!(paginator.next_cursor(&body, 1, &mut state).is_none(), "{body}");
    }
}

// ============================================================================
// Next-Token Tests
// ============================================================================

#[test]
fn test_next_token_follows_token() {
    let mut driver = PaginationDriver::new(true, &PaginationConfig::next_token("$.next", "cursor"));

    let phase = driver.advance(&json!({"items": [1, 2], "next": "abc"}), 2);
    assert_eq!(phase, PaginationPhase::HasMore);
    assert_eq!(driver.cursor(), Some(&PageCursor::with_param("cursor", "abc")));

    let phase = driver.advance(&json!({"items": [3], "next": ""}), 1);
    assert_eq!(phase, PaginationPhase::Done);
}

#[test]
fn test_next_token_stops_on_empty_page() {
    let paginator = NextTokenPaginator::new("next", "cursor");
    let mut state = PaginationState::new();
    assert!(paginator
        .next_cursor(&json!({"next": "abc"}), 0, &mut state)
        .is_none());
}

#[test]
fn test_next_token_numeric_token() {
    let paginator = NextTokenPaginator::new("meta.next_page", "page");
    let mut state = PaginationState::new();
    let cursor = paginator.next_cursor(&json!({"meta": {"next_page": 3}}), 5, &mut state);
    assert_eq!(cursor, Some(PageCursor::with_param("page", "3")));
}

// ============================================================================
// Driver Tests
// ============================================================================

#[test]
fn test_pagination_disabled_stops_after_one_page() {
    // a body that would otherwise continue
    let mut driver = PaginationDriver::new(false, &forecast_config());
    assert_eq!(driver.advance(&forecast_page(40, 1), 1), PaginationPhase::Done);
    assert_eq!(driver.pages(), 1);
}

#[test]
fn test_no_paginator_is_single_page() {
    let mut driver = PaginationDriver::new(true, &PaginationConfig::None);
    assert_eq!(driver.advance(&json!({"next": "abc"}), 1), PaginationPhase::Done);
}

#[test]
fn test_advance_after_done_is_noop() {
    let mut driver = PaginationDriver::new(true, &forecast_config());
    driver.advance(&forecast_page(2, 2), 1);
    assert!(driver.is_done());

    assert_eq!(driver.advance(&forecast_page(40, 1), 1), PaginationPhase::Done);
    assert_eq!(driver.pages(), 1);
}
