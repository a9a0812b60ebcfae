use serde::Serialize;

use callboard_core::filter::ListFilter;
use callboard_core::merge::merge_update;
use callboard_types::{
    Fetched,
    call::CallSession,
    event::DeskEvent,
    ticket::Ticket,
};

/// Active-calls table
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallListView {
    pub calls: Vec<CallSession>,
    pub loading: bool,
    pub placeholder: bool,
    #[serde(skip)]
    pub filter: ListFilter,
}

impl CallListView {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn load(&mut self, fetched: Fetched<Vec<CallSession>>) {
        self.loading = false;
        self.placeholder = fetched.is_placeholder();
        self.calls = fetched.into_inner();
    }

    pub fn visible(&self) -> Vec<&CallSession> {
        self.filter.apply_calls(&self.calls)
    }

    pub fn apply(&mut self, event: &DeskEvent) {
        match event {
            DeskEvent::CallUpdate(update) => {
                if let Some(row) = self.calls.iter_mut().find(|c| c.call_id == update.call_id) {
                    *row = merge_update(Some(row), update);
                }
            }
            DeskEvent::StreamEnded { call_id } => {
                if let Some(row) = self.calls.iter_mut().find(|c| c.call_id == *call_id) {
                    row.is_active = false;
                }
            }
            DeskEvent::TicketCreated { call_id, ticket_id } => {
                if let Some(row) = self.calls.iter_mut().find(|c| c.call_id == *call_id) {
                    row.ticket_id = Some(ticket_id.clone());
                }
            }
            _ => {}
        }
    }
}

/// Tickets table
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketListView {
    pub tickets: Vec<Ticket>,
    pub loading: bool,
    pub placeholder: bool,
    /// A ticket was created since the last load; the list needs a refetch
    pub stale: bool,
    #[serde(skip)]
    pub filter: ListFilter,
}

impl TicketListView {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn load(&mut self, fetched: Fetched<Vec<Ticket>>) {
        self.loading = false;
        self.stale = false;
        self.placeholder = fetched.is_placeholder();
        self.tickets = fetched.into_inner();
    }

    pub fn visible(&self) -> Vec<&Ticket> {
        self.filter.apply_tickets(&self.tickets)
    }

    pub fn apply(&mut self, event: &DeskEvent) {
        match event {
            DeskEvent::TicketClosed {
                ticket_id,
                closed_at,
            } => {
                if let Some(row) = self
                    .tickets
                    .iter_mut()
                    .find(|t| t.ticket_id == *ticket_id && !t.is_closed())
                {
                    let _ = row.mark_closed(closed_at.clone());
                }
            }
            DeskEvent::TicketCreated { .. } => self.stale = true,
            _ => {}
        }
    }
}
