//! WASM-target tests for callboard-core.
//!
//! Runs EventBus, merge, stream decoding and facade fallbacks
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use callboard_core::event_bus::EventBus;
use callboard_core::facade::DeskApi;
use callboard_core::merge::merge_update;
use callboard_core::ports::*;
use callboard_core::stream::decode_frame;
use callboard_types::call::Speaker;
use callboard_types::config::BackendConfig;
use callboard_types::event::DeskEvent;
use callboard_types::stream::TranscriptUpdate;
use callboard_types::{DeskError, Fetched};

use std::cell::RefCell;
use std::rc::Rc;
use async_trait::async_trait;

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(DeskEvent::StreamEnded { call_id: "C1".to_string() });
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

// ─── Merge Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn merge_frame_into_absent_state() {
    let frame = r#"{"type":"transcript_update","call_id":"C1",
        "transcript":[{"role":"agent","content":"hi"}],"is_active":true}"#;
    let update = decode_frame("C1", frame).unwrap();
    let state = merge_update(None, &update);
    assert_eq!(state.transcript().len(), 1);
    assert_eq!(state.transcript()[0].role, Speaker::Agent);
    assert!(state.is_active);
}

#[wasm_bindgen_test]
fn merge_keeps_summary_over_empty() {
    let mut first = TranscriptUpdate::new("C1", true);
    first.summary = Some("X".to_string());
    let mut second = TranscriptUpdate::new("C1", true);
    second.summary = Some(String::new());
    let state = merge_update(None, &first);
    let state = merge_update(Some(&state), &second);
    assert_eq!(state.summary.as_deref(), Some("X"));
}

// ─── Facade Tests ────────────────────────────────────────

struct FailingHttp {
    seen: RefCell<Vec<String>>,
    status: u16,
}

#[async_trait(?Send)]
impl HttpPort for FailingHttp {
    async fn send(&self, req: HttpRequest) -> callboard_types::Result<HttpResponse> {
        self.seen.borrow_mut().push(req.url);
        Ok(HttpResponse {
            status: self.status,
            status_text: "Internal Server Error".to_string(),
            body: String::new(),
        })
    }
}

#[wasm_bindgen_test]
async fn tickets_fall_back_when_backend_fails() {
    let http = Rc::new(FailingHttp { seen: RefCell::new(Vec::new()), status: 500 });
    let api = DeskApi::new(http.clone(), BackendConfig::default());
    assert_eq!(api.list_tickets().await, Fetched::Placeholder(Vec::new()));
    assert_eq!(http.seen.borrow().len(), 1);
}

#[wasm_bindgen_test]
async fn close_ticket_surfaces_status() {
    let http = Rc::new(FailingHttp { seen: RefCell::new(Vec::new()), status: 500 });
    let api = DeskApi::new(http, BackendConfig::default());
    let err = api.close_ticket("T-1234", "resolved by workaround").await.unwrap_err();
    assert!(matches!(err, DeskError::RequestFailed { status: Some(500), .. }));
}
