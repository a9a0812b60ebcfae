use serde::{Deserialize, Deserializer, Serialize};

/// Who spoke a transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Agent,
    #[serde(alias = "customer", alias = "user")]
    Caller,
    System,
    #[serde(other)]
    Unknown,
}

/// One line of a call transcript. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Speaker,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl TranscriptEntry {
    pub fn new(role: Speaker, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            time: None,
        }
    }
}

/// A recommended next action shown next to a call or ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
}

/// A live or completed phone interaction, as last seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSession {
    pub call_id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub caller_number: String,
    #[serde(default)]
    pub last_activity: String,
    /// Whole seconds. Fractional or negative values from the backend are
    /// floored and clamped at zero.
    #[serde(default, deserialize_with = "whole_seconds")]
    pub duration: u64,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<TranscriptEntry>>,
}

pub const UNKNOWN: &str = "unknown";

impl CallSession {
    /// Record used when the call could not be fetched.
    pub fn placeholder(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            agent_id: UNKNOWN.to_string(),
            start_time: String::new(),
            caller_number: UNKNOWN.to_string(),
            last_activity: String::new(),
            duration: 0,
            is_active: false,
            ticket_id: None,
            summary: None,
            suggestions: None,
            transcript: None,
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.transcript.as_deref().unwrap_or(&[])
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        self.suggestions.as_deref().unwrap_or(&[])
    }

    pub fn has_ticket(&self) -> bool {
        self.ticket_id.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration)
    }
}

fn whole_seconds<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = Option::<f64>::deserialize(deserializer)?;
    Ok(seconds
        .filter(|s| s.is_finite() && *s > 0.0)
        .map_or(0, |s| s.floor() as u64))
}

/// Formats seconds as `M:SS`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
