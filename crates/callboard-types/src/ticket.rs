use std::fmt;

use serde::{Deserialize, Serialize};

use crate::call::{Suggestion, TranscriptEntry};
use crate::{DeskError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Pending,
    Closed,
}

impl TicketStatus {
    /// `Closed` is terminal; every other move is allowed.
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        self != TicketStatus::Closed || next == TicketStatus::Closed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Pending => "pending",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A support case, optionally linked to a call.
///
/// `closed_at` is set exactly when `status == Closed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    #[serde(default)]
    pub call_id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub caller_number: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<TranscriptEntry>>,
}

impl Ticket {
    /// Record used when the ticket could not be fetched.
    pub fn placeholder(ticket_id: impl Into<String>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            call_id: String::new(),
            agent_id: crate::call::UNKNOWN.to_string(),
            caller_number: crate::call::UNKNOWN.to_string(),
            status: TicketStatus::Pending,
            created_at: String::new(),
            updated_at: String::new(),
            closed_at: None,
            summary: None,
            suggestions: None,
            transcript: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == TicketStatus::Closed
    }

    /// Applies a successful close locally. Fails on an already-closed ticket.
    pub fn mark_closed(&mut self, at: impl Into<String>) -> Result<()> {
        if self.is_closed() {
            return Err(DeskError::InvalidTransition {
                ticket_id: self.ticket_id.clone(),
                from: self.status.to_string(),
                to: TicketStatus::Closed.to_string(),
            });
        }
        let at = at.into();
        self.status = TicketStatus::Closed;
        self.updated_at = at.clone();
        self.closed_at = Some(at);
        Ok(())
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.transcript.as_deref().unwrap_or(&[])
    }
}

/// Body of the ticket-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub call_id: String,
    pub agent_id: String,
    pub caller_number: String,
}
