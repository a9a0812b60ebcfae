use serde::{Deserialize, Serialize};

use crate::call::{CallSession, Suggestion, TranscriptEntry};

/// One message received over the live-update connection.
///
/// Only `transcript_update` carries meaning; any other tag lands in
/// `Unknown` and is ignored by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEnvelope {
    TranscriptUpdate(TranscriptUpdate),
    #[serde(other)]
    Unknown,
}

impl StreamEnvelope {
    pub fn parse(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Full snapshot of a call pushed by the backend. The transcript is a
/// replacement, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptUpdate {
    pub call_id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
}

impl TranscriptUpdate {
    pub fn new(call_id: impl Into<String>, is_active: bool) -> Self {
        Self {
            call_id: call_id.into(),
            agent_id: String::new(),
            transcript: Vec::new(),
            start_time: None,
            last_updated: None,
            is_active,
            ticket_id: None,
            summary: None,
            suggestions: None,
        }
    }

    /// Repackages a fetched call so polled snapshots flow through the same
    /// handlers as streamed ones.
    pub fn from_snapshot(call: &CallSession) -> Self {
        Self {
            call_id: call.call_id.clone(),
            agent_id: call.agent_id.clone(),
            transcript: call.transcript().to_vec(),
            start_time: non_empty(&call.start_time),
            last_updated: non_empty(&call.last_activity),
            is_active: call.is_active,
            ticket_id: call.ticket_id.clone(),
            summary: call.summary.clone(),
            suggestions: call.suggestions.clone(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
