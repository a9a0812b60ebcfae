use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeskError {
    /// Non-2xx response, or no response at all (`status == None`).
    #[error("Request failed: {} {reason}", describe_status(.status))]
    RequestFailed { status: Option<u16>, reason: String },

    #[error("Live updates for call {call_id} unavailable after {attempts} attempts")]
    StreamUnavailable { call_id: String, attempts: u32 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("Ticket {ticket_id} cannot move from {from} to {to}")]
    InvalidTransition {
        ticket_id: String,
        from: String,
        to: String,
    },
}

impl DeskError {
    pub fn request_failed(status: u16, reason: impl Into<String>) -> Self {
        DeskError::RequestFailed {
            status: Some(status),
            reason: reason.into(),
        }
    }

    pub fn network(reason: impl Into<String>) -> Self {
        DeskError::RequestFailed {
            status: None,
            reason: reason.into(),
        }
    }

    /// HTTP status carried by a `RequestFailed`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeskError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Text shown to the agent for failures that reach the presentation layer.
    pub fn notice(&self) -> String {
        match self {
            DeskError::StreamUnavailable { .. } => {
                "Unable to load call data after multiple attempts. The call may have ended."
                    .to_string()
            }
            DeskError::RequestFailed { status: None, .. } => {
                "Could not reach the server. Please check your connection and try again."
                    .to_string()
            }
            DeskError::RequestFailed { .. } => {
                format!("The server rejected the request ({}). Please try again.", self)
            }
            DeskError::InvalidTransition { ticket_id, .. } => {
                format!("Ticket {} is already closed.", ticket_id)
            }
            other => other.to_string(),
        }
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_string(),
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::Parse(e.to_string())
    }
}
