//! Timer adapter via gloo-timers (`setTimeout`).

use async_trait::async_trait;
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;

use callboard_core::ports::{SleepPort, TimerHandle, TimerPort};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimers;

impl BrowserTimers {
    pub fn new() -> Self {
        Self
    }
}

impl TimerPort for BrowserTimers {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle> {
        Box::new(BrowserTimer {
            timeout: Some(Timeout::new(delay_ms, callback)),
        })
    }
}

#[async_trait(?Send)]
impl SleepPort for BrowserTimers {
    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

/// Dropping a gloo `Timeout` clears it, so the handle owns it until
/// cancelled or dropped.
struct BrowserTimer {
    timeout: Option<Timeout>,
}

impl TimerHandle for BrowserTimer {
    fn cancel(&mut self) {
        if let Some(timeout) = self.timeout.take() {
            timeout.cancel();
        }
    }
}
