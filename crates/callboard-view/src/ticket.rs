use serde::Serialize;

use callboard_types::{
    Fetched, Result,
    event::DeskEvent,
    ticket::Ticket,
};

/// State behind the ticket detail page, including the close dialog.
#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    pub ticket_id: String,
    pub ticket: Option<Ticket>,
    pub loading: bool,
    pub placeholder: bool,
    /// Draft resolution text
    pub resolution: String,
    pub submitting: bool,
    pub notice: Option<String>,
}

impl TicketView {
    pub fn new(ticket_id: impl Into<String>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            ticket: None,
            loading: true,
            placeholder: false,
            resolution: String::new(),
            submitting: false,
            notice: None,
        }
    }

    pub fn load(&mut self, fetched: Fetched<Ticket>) {
        self.loading = false;
        self.placeholder = fetched.is_placeholder();
        self.ticket = Some(fetched.into_inner());
    }

    pub fn can_close(&self) -> bool {
        !self.submitting
            && !self.placeholder
            && self.ticket.as_ref().is_some_and(|t| !t.is_closed())
    }

    /// Marks the close as in flight and returns the resolution to send.
    pub fn begin_close(&mut self, resolution: impl Into<String>) -> Option<String> {
        if !self.can_close() {
            return None;
        }
        self.resolution = resolution.into();
        self.submitting = true;
        self.notice = None;
        Some(self.resolution.clone())
    }

    /// On failure the ticket is left untouched and another attempt is allowed.
    pub fn finish_close(&mut self, result: &Result<()>, closed_at: &str) {
        self.submitting = false;
        match result {
            Ok(()) => {
                if let Some(ticket) = self.ticket.as_mut() {
                    if let Err(e) = ticket.mark_closed(closed_at) {
                        log::warn!("{}", e);
                    }
                }
                self.resolution.clear();
            }
            Err(e) => {
                self.notice = Some(format!("Failed to close ticket. {}", e.notice()));
            }
        }
    }

    pub fn apply(&mut self, event: &DeskEvent) {
        if let DeskEvent::TicketClosed {
            ticket_id,
            closed_at,
        } = event
        {
            if *ticket_id != self.ticket_id {
                return;
            }
            if let Some(ticket) = self.ticket.as_mut().filter(|t| !t.is_closed()) {
                let _ = ticket.mark_closed(closed_at.clone());
            }
        }
    }
}
