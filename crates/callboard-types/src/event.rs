use serde::{Deserialize, Serialize};

use crate::stream::TranscriptUpdate;

/// Events published on the dashboard bus.
/// View state objects drain these to stay current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeskEvent {
    /// A fresh snapshot for a watched call
    CallUpdate(TranscriptUpdate),

    /// The live connection went quiet and is being reopened
    StreamRetrying {
        call_id: String,
        attempt: u32,
        max_attempts: u32,
    },

    /// The call reported itself inactive; no more updates will arrive
    StreamEnded { call_id: String },

    /// Retry budget exhausted
    StreamUnavailable { call_id: String, notice: String },

    TicketClosed { ticket_id: String, closed_at: String },

    TicketCreated { call_id: String, ticket_id: String },

    /// A mutation failed and the agent should be told
    RequestFailed { operation: String, notice: String },
}

impl DeskEvent {
    /// Call the event concerns, if any.
    pub fn call_id(&self) -> Option<&str> {
        match self {
            DeskEvent::CallUpdate(update) => Some(&update.call_id),
            DeskEvent::StreamRetrying { call_id, .. }
            | DeskEvent::StreamEnded { call_id }
            | DeskEvent::StreamUnavailable { call_id, .. }
            | DeskEvent::TicketCreated { call_id, .. } => Some(call_id),
            DeskEvent::TicketClosed { .. } | DeskEvent::RequestFailed { .. } => None,
        }
    }
}
