use serde::Serialize;

use callboard_core::merge::{merge_into, merge_update};
use callboard_types::{
    DeskError, Fetched, Result,
    call::CallSession,
    event::DeskEvent,
    stream::TranscriptUpdate,
    ticket::NewTicket,
};

/// Connection state as shown to the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StreamStatus {
    Connecting,
    Reconnecting { attempt: u32, max_attempts: u32 },
    Live,
    Ended,
    Unavailable,
}

/// State behind the call detail page
#[derive(Debug, Clone, Serialize)]
pub struct CallView {
    pub call_id: String,
    pub call: Option<CallSession>,
    pub loading: bool,
    /// The displayed call is fallback content, not backend data
    pub placeholder: bool,
    pub stream: StreamStatus,
    /// User-visible failure text
    pub notice: Option<String>,
    pub creating_ticket: bool,
}

impl CallView {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            call: None,
            loading: true,
            placeholder: false,
            stream: StreamStatus::Connecting,
            notice: None,
            creating_ticket: false,
        }
    }

    /// Install the fetched record. Stream data that already arrived is
    /// fresher and is layered back on top.
    pub fn load(&mut self, fetched: Fetched<CallSession>) {
        self.loading = false;
        match (self.call.take(), fetched) {
            (Some(current), Fetched::Placeholder(_)) => {
                self.call = Some(current);
            }
            (Some(current), Fetched::Live(fresh)) => {
                let streamed = TranscriptUpdate::from_snapshot(&current);
                self.call = Some(merge_update(Some(&fresh), &streamed));
                self.placeholder = false;
            }
            (None, fetched) => {
                self.placeholder = fetched.is_placeholder();
                self.call = Some(fetched.into_inner());
            }
        }
    }

    pub fn process_events(&mut self, events: Vec<DeskEvent>) {
        for event in &events {
            self.apply(event);
        }
    }

    pub fn apply(&mut self, event: &DeskEvent) {
        if event.call_id() != Some(self.call_id.as_str()) {
            return;
        }
        match event {
            DeskEvent::CallUpdate(update) => {
                merge_into(&mut self.call, update);
                self.loading = false;
                self.placeholder = false;
                self.notice = None;
                if self.stream != StreamStatus::Ended {
                    self.stream = StreamStatus::Live;
                }
            }
            DeskEvent::StreamRetrying {
                attempt,
                max_attempts,
                ..
            } => {
                self.stream = StreamStatus::Reconnecting {
                    attempt: *attempt,
                    max_attempts: *max_attempts,
                };
            }
            DeskEvent::StreamEnded { .. } => {
                self.stream = StreamStatus::Ended;
            }
            DeskEvent::StreamUnavailable { notice, .. } => {
                self.stream = StreamStatus::Unavailable;
                self.loading = false;
                self.notice = Some(notice.clone());
            }
            DeskEvent::TicketCreated { ticket_id, .. } => {
                if let Some(call) = self.call.as_mut() {
                    call.ticket_id = Some(ticket_id.clone());
                }
                self.creating_ticket = false;
            }
            DeskEvent::TicketClosed { .. } | DeskEvent::RequestFailed { .. } => {}
        }
    }

    pub fn can_retry(&self) -> bool {
        self.stream == StreamStatus::Unavailable
    }

    /// Clear the failure so a new supervised stream can start.
    pub fn reset_for_retry(&mut self) {
        self.stream = StreamStatus::Connecting;
        self.notice = None;
        self.loading = self.call.is_none();
    }

    /// Request body for "convert to ticket", or `None` when the call already
    /// has one, is not loaded, or a request is in flight.
    pub fn begin_create_ticket(&mut self) -> Option<NewTicket> {
        if self.creating_ticket || self.placeholder {
            return None;
        }
        let call = self.call.as_ref().filter(|c| !c.has_ticket())?;
        self.creating_ticket = true;
        self.notice = None;
        Some(NewTicket {
            call_id: call.call_id.clone(),
            agent_id: call.agent_id.clone(),
            caller_number: call.caller_number.clone(),
        })
    }

    pub fn finish_create_ticket(&mut self, result: &Result<String>) {
        self.creating_ticket = false;
        match result {
            Ok(ticket_id) => {
                if let Some(call) = self.call.as_mut() {
                    call.ticket_id = Some(ticket_id.clone());
                }
            }
            Err(e) => {
                log::warn!("Ticket creation for call {} failed: {}", self.call_id, e);
                self.notice = Some(format!("Failed to create ticket. {}", e.notice()));
            }
        }
    }

    pub fn fail(&mut self, error: &DeskError) {
        self.notice = Some(error.notice());
    }
}
