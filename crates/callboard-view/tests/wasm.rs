//! WASM-target tests for callboard-view.

use wasm_bindgen_test::*;

use callboard_types::call::CallSession;
use callboard_types::event::DeskEvent;
use callboard_types::stream::TranscriptUpdate;
use callboard_types::ticket::{Ticket, TicketStatus};
use callboard_types::{DeskError, Fetched};
use callboard_view::{CallView, StreamStatus, TicketView};

#[wasm_bindgen_test]
fn call_view_reports_unavailable() {
    let mut view = CallView::new("C1");
    view.load(Fetched::Placeholder(CallSession::placeholder("C1")));
    let notice = DeskError::StreamUnavailable { call_id: "C1".to_string(), attempts: 3 }.notice();
    view.apply(&DeskEvent::StreamUnavailable { call_id: "C1".to_string(), notice });
    assert_eq!(view.stream, StreamStatus::Unavailable);
    assert!(view.can_retry());
}

#[wasm_bindgen_test]
fn call_view_goes_live_on_update() {
    let mut view = CallView::new("C1");
    view.apply(&DeskEvent::CallUpdate(TranscriptUpdate::new("C1", true)));
    assert_eq!(view.stream, StreamStatus::Live);
    assert!(view.call.as_ref().unwrap().is_active);
}

#[wasm_bindgen_test]
fn ticket_view_failed_close_keeps_status() {
    let mut placeholder = Ticket::placeholder("T-1");
    placeholder.status = TicketStatus::Open;
    let mut view = TicketView::new("T-1");
    view.load(Fetched::Live(placeholder));
    view.begin_close("done").unwrap();
    view.finish_close(&Err(DeskError::request_failed(503, "Service Unavailable")), "now");
    assert_eq!(view.ticket.as_ref().unwrap().status, TicketStatus::Open);
    assert!(view.can_close());
}
