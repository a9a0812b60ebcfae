//! WASM-target tests for callboard-types.
//!
//! Covers the wire shapes under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use callboard_types::call::*;
use callboard_types::config::*;
use callboard_types::stream::*;
use callboard_types::ticket::*;
use callboard_types::DeskError;

// ─── Wire Shape Tests ────────────────────────────────────

#[wasm_bindgen_test]
fn calls_listing_shape() {
    let body = r#"{"calls":[{
        "call_id":"C1","agent_id":"A1","start_time":"2025-03-01T10:00:00Z",
        "caller_number":"+15550100","last_activity":"2025-03-01T10:01:00Z",
        "duration":60,"is_active":true,
        "suggestions":[{"title":"Reset","description":"Reset the router"}]
    }]}"#;
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    let calls: Vec<CallSession> = serde_json::from_value(value["calls"].clone()).unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].suggestions()[0].title, "Reset");
    assert_eq!(calls[0].formatted_duration(), "1:00");
}

#[wasm_bindgen_test]
fn ticket_with_transcript() {
    let body = r#"{
        "ticket_id":"T-1","call_id":"C1","agent_id":"A1","caller_number":"+1",
        "status":"closed","created_at":"a","updated_at":"b","closed_at":"b",
        "transcript":[{"role":"caller","content":"hi","time":"10:00"}]
    }"#;
    let ticket: Ticket = serde_json::from_str(body).unwrap();
    assert!(ticket.is_closed());
    assert_eq!(ticket.transcript()[0].time.as_deref(), Some("10:00"));
}

#[wasm_bindgen_test]
fn envelope_tags() {
    let update = r#"{"type":"transcript_update","call_id":"C1","is_active":false}"#;
    assert!(matches!(
        StreamEnvelope::parse(update).unwrap(),
        StreamEnvelope::TranscriptUpdate(_)
    ));
    let other = r#"{"type":"call_started","call_id":"C1"}"#;
    assert_eq!(StreamEnvelope::parse(other).unwrap(), StreamEnvelope::Unknown);
}

#[wasm_bindgen_test]
fn stream_url_from_default_config() {
    let config = DeskConfig::default();
    assert_eq!(
        config.backend.stream_url("C42"),
        "ws://localhost:8081/frontend-ws/C42"
    );
}

#[wasm_bindgen_test]
fn closed_ticket_rejects_second_close() {
    let mut ticket = Ticket::placeholder("T-2");
    ticket.mark_closed("now").unwrap();
    assert!(matches!(
        ticket.mark_closed("later"),
        Err(DeskError::InvalidTransition { .. })
    ));
}
