//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `callboard-core` (pure Rust).
//! Implementations live in `callboard-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::rc::Rc;
use async_trait::async_trait;
use callboard_types::Result;

// ─── HTTP Port ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A JSON request/response call to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// JSON body, POST only
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: Some(body.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait(?Send)]
pub trait HttpPort {
    /// Perform the request. Transport failures are `RequestFailed` with no
    /// status; non-2xx responses are returned as-is for the caller to judge.
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse>;
}

// ─── Socket Port ─────────────────────────────────────────────

/// Receives each inbound text frame.
pub type FrameHandler = Rc<dyn Fn(String)>;

pub trait SocketPort {
    /// Open a duplex text connection. Frames are delivered asynchronously
    /// on the host event loop.
    fn connect(&self, url: &str, on_frame: FrameHandler) -> Result<Box<dyn SocketConnection>>;
}

pub trait SocketConnection {
    /// Idempotent.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

// ─── Timer Port ──────────────────────────────────────────────

pub trait TimerPort {
    /// Run `callback` once after `delay_ms` unless cancelled first.
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle>;
}

pub trait TimerHandle {
    /// Idempotent. A cancelled callback never runs.
    fn cancel(&mut self);
}

#[async_trait(?Send)]
pub trait SleepPort {
    async fn sleep(&self, ms: u32);
}
