//! Polling transport — re-fetches a call on a fixed interval.
//!
//! An alternative to the live stream when sockets are unavailable. Snapshots
//! are delivered through the same `UpdateHandler` as streamed ones, so view
//! state cannot tell them apart. Displayed data may be up to one interval old.

use std::cell::Cell;
use std::rc::Rc;

use callboard_types::{Fetched, config::PollConfig, stream::TranscriptUpdate};
use crate::facade::DeskApi;
use crate::ports::SleepPort;
use crate::stream::UpdateHandler;

/// Cooperative stop flag, checked before each fetch and before delivery.
#[derive(Clone, Default)]
pub struct PollStop(Rc<Cell<bool>>);

impl PollStop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

pub struct CallPoller {
    api: Rc<DeskApi>,
    sleeper: Rc<dyn SleepPort>,
    interval_ms: u32,
}

impl CallPoller {
    pub fn new(api: Rc<DeskApi>, sleeper: Rc<dyn SleepPort>, config: &PollConfig) -> Self {
        Self {
            api,
            sleeper,
            interval_ms: config.interval_ms,
        }
    }

    /// Worst-case age of a delivered snapshot.
    pub fn staleness_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Poll until stopped or the call goes inactive. Placeholder results are
    /// never delivered. Returns how many snapshots were handed over.
    pub async fn run(&self, call_id: &str, on_update: UpdateHandler, stop: PollStop) -> usize {
        let mut delivered = 0;
        loop {
            if stop.is_stopped() {
                break;
            }
            match self.api.get_call(call_id).await {
                Fetched::Live(call) => {
                    if stop.is_stopped() {
                        break;
                    }
                    let active = call.is_active;
                    on_update(TranscriptUpdate::from_snapshot(&call));
                    delivered += 1;
                    if !active {
                        log::info!("Call {} ended, polling stopped", call_id);
                        break;
                    }
                }
                Fetched::Placeholder(_) => {
                    log::debug!("Poll for call {} returned no data", call_id);
                }
            }
            self.sleeper.sleep(self.interval_ms).await;
        }
        delivered
    }
}
