use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::{DeskError, Result};

pub const DEFAULT_API_BASE: &str = "http://localhost:8081";

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes an id for use as a single URL path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    pub backend: BackendConfig,
    pub stream: StreamConfig,
    pub poll: PollConfig,
}

impl DeskConfig {
    /// Reads `CALLBOARD_API_URL` and `CALLBOARD_OFFLINE` at compile time.
    /// The browser has no process environment, so these are baked in.
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(base) = option_env!("CALLBOARD_API_URL") {
            if !base.trim().is_empty() {
                config.backend.api_base = base.trim().to_string();
            }
        }
        if let Some(flag) = option_env!("CALLBOARD_OFFLINE") {
            config.backend.offline = parse_flag(flag);
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        self.backend.validate()?;
        if self.stream.idle_timeout_ms == 0 {
            return Err(DeskError::Config("stream idle timeout must be non-zero".to_string()));
        }
        if self.stream.max_attempts == 0 {
            return Err(DeskError::Config("stream max_attempts must be at least 1".to_string()));
        }
        if self.poll.interval_ms == 0 {
            return Err(DeskError::Config("poll interval must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// `http(s)://host:port`, no trailing slash
    pub api_base: String,
    /// Skip the network entirely and serve placeholders
    pub offline: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            offline: false,
        }
    }
}

impl BackendConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            offline: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host().is_empty() {
            return Err(DeskError::Config(format!(
                "api_base must be an http(s) URL, got {:?}",
                self.api_base
            )));
        }
        Ok(())
    }

    pub fn is_secure(&self) -> bool {
        self.api_base.starts_with("https://")
    }

    /// `host:port` part of the base URL, empty when the scheme is not http(s).
    pub fn host(&self) -> &str {
        self.api_base
            .strip_prefix("https://")
            .or_else(|| self.api_base.strip_prefix("http://"))
            .map(|rest| rest.trim_end_matches('/'))
            .unwrap_or("")
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Live-update URL for one call.
    pub fn stream_url(&self, call_id: &str) -> String {
        let scheme = if self.is_secure() { "wss" } else { "ws" };
        format!(
            "{}://{}/frontend-ws/{}",
            scheme,
            self.host(),
            encode_segment(call_id)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Silence tolerated before the connection is reopened
    pub idle_timeout_ms: u32,
    /// Connection attempts (including the first) before giving up
    pub max_attempts: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 5_000,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between re-fetches; also the worst-case staleness
    pub interval_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: 5_000 }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
