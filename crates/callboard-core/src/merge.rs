//! Folds live updates into the last-known call state.
//!
//! Transcript and suggestions are full snapshots: the latest non-empty one
//! wins, nothing is concatenated. Known values are never overwritten by
//! empty ones. Merging the same update twice gives the same state.

use callboard_types::call::{CallSession, UNKNOWN};
use callboard_types::stream::TranscriptUpdate;

pub fn merge_update(previous: Option<&CallSession>, update: &TranscriptUpdate) -> CallSession {
    let mut next = match previous {
        Some(prev) => prev.clone(),
        None => seed(update),
    };

    if !update.transcript.is_empty() {
        next.transcript = Some(update.transcript.clone());
    }
    if let Some(summary) = non_empty(&update.summary) {
        next.summary = Some(summary.to_string());
    }
    if let Some(suggestions) = update.suggestions.as_ref().filter(|s| !s.is_empty()) {
        next.suggestions = Some(suggestions.clone());
    }
    if let Some(ticket_id) = non_empty(&update.ticket_id) {
        next.ticket_id = Some(ticket_id.to_string());
    }

    next.is_active = update.is_active;
    if let Some(ts) = non_empty(&update.last_updated) {
        next.last_activity = ts.to_string();
    }

    next
}

/// In-place variant for view state holding an optional call.
pub fn merge_into(slot: &mut Option<CallSession>, update: &TranscriptUpdate) {
    let merged = merge_update(slot.as_ref(), update);
    *slot = Some(merged);
}

/// State for a call first seen through the stream.
fn seed(update: &TranscriptUpdate) -> CallSession {
    let start_time = update.start_time.clone().unwrap_or_default();
    CallSession {
        call_id: update.call_id.clone(),
        agent_id: if update.agent_id.is_empty() {
            UNKNOWN.to_string()
        } else {
            update.agent_id.clone()
        },
        last_activity: start_time.clone(),
        start_time,
        caller_number: UNKNOWN.to_string(),
        duration: 0,
        is_active: update.is_active,
        ticket_id: None,
        summary: None,
        suggestions: None,
        transcript: None,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
