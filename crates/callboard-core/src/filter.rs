//! Client-side filtering for the call and ticket lists.

use chrono::{DateTime, NaiveDate, Utc};

use callboard_types::call::CallSession;
use callboard_types::ticket::{Ticket, TicketStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    /// Case-insensitive substring over ids, caller number and summary
    pub query: String,
    /// Keep records started/created on this UTC date
    pub on_date: Option<NaiveDate>,
    /// Tickets only
    pub status: Option<TicketStatus>,
}

impl ListFilter {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.on_date.is_none() && self.status.is_none()
    }

    pub fn matches_call(&self, call: &CallSession) -> bool {
        matches_query(
            &self.query,
            &[
                &call.call_id,
                &call.caller_number,
                call.ticket_id.as_deref().unwrap_or(""),
                call.summary.as_deref().unwrap_or(""),
            ],
        ) && matches_date(self.on_date, &call.start_time)
    }

    pub fn matches_ticket(&self, ticket: &Ticket) -> bool {
        matches_query(
            &self.query,
            &[
                &ticket.ticket_id,
                &ticket.call_id,
                &ticket.caller_number,
                ticket.summary.as_deref().unwrap_or(""),
            ],
        ) && matches_date(self.on_date, &ticket.created_at)
            && self.status.map_or(true, |s| s == ticket.status)
    }

    pub fn apply_calls<'a>(&self, calls: &'a [CallSession]) -> Vec<&'a CallSession> {
        calls.iter().filter(|c| self.matches_call(c)).collect()
    }

    pub fn apply_tickets<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        tickets.iter().filter(|t| self.matches_ticket(t)).collect()
    }
}

fn matches_query(query: &str, fields: &[&str]) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

fn matches_date(on: Option<NaiveDate>, timestamp: &str) -> bool {
    match on {
        None => true,
        Some(day) => DateTime::parse_from_rfc3339(timestamp)
            .map(|t| t.with_timezone(&Utc).date_naive() == day)
            .unwrap_or(false),
    }
}
