//! Reconnect supervisor — keeps one live-update connection per call alive.
//!
//! An idle timer is armed on every open and every received update. When it
//! fires, the current connection is closed and a new one opened, until
//! `max_attempts` connections in a row have produced nothing. Then the
//! caller gets `StreamEvent::Unavailable` instead of an error.
//!
//! Everything runs on the single-threaded host event loop. Callbacks hold
//! `Weak` references, so dropping the `Subscription` releases the socket
//! and the timer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use callboard_types::{
    DeskError,
    config::StreamConfig,
    event::DeskEvent,
    stream::TranscriptUpdate,
};
use crate::ports::{TimerHandle, TimerPort};
use crate::stream::{StreamClient, StreamHandle, UpdateHandler};

/// What the supervisor reports to its caller
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Update(TranscriptUpdate),
    /// The previous connection went quiet. `attempt` numbers the connection
    /// now opening within the current silent run, where the first
    /// connection of the run (the initial open, or the one that last
    /// carried data) is attempt 1. The first retry is always attempt 2.
    Retrying { attempt: u32, max_attempts: u32 },
    /// The call reported itself inactive; no more updates will come
    Ended,
    /// Retry budget exhausted. Carries `DeskError::StreamUnavailable`.
    Unavailable(DeskError),
}

impl StreamEvent {
    /// Bus form of the event, tagged with the call it belongs to.
    pub fn into_desk_event(self, call_id: &str) -> DeskEvent {
        let call_id = call_id.to_string();
        match self {
            StreamEvent::Update(update) => DeskEvent::CallUpdate(update),
            StreamEvent::Retrying {
                attempt,
                max_attempts,
            } => DeskEvent::StreamRetrying {
                call_id,
                attempt,
                max_attempts,
            },
            StreamEvent::Ended => DeskEvent::StreamEnded { call_id },
            StreamEvent::Unavailable(error) => DeskEvent::StreamUnavailable {
                call_id,
                notice: error.notice(),
            },
        }
    }
}

pub type StreamEventHandler = Rc<dyn Fn(StreamEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Connecting,
    Live,
    Ended,
    Unavailable,
    Cancelled,
}

impl SupervisorState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SupervisorState::Ended | SupervisorState::Unavailable | SupervisorState::Cancelled
        )
    }
}

pub struct ReconnectSupervisor {
    client: Rc<StreamClient>,
    timers: Rc<dyn TimerPort>,
    policy: StreamConfig,
}

impl ReconnectSupervisor {
    pub fn new(client: Rc<StreamClient>, timers: Rc<dyn TimerPort>, policy: StreamConfig) -> Self {
        Self {
            client,
            timers,
            policy,
        }
    }

    pub fn policy(&self) -> &StreamConfig {
        &self.policy
    }

    /// Start watching a call. Keep the returned subscription alive for as
    /// long as updates are wanted.
    pub fn supervise(&self, call_id: &str, on_event: StreamEventHandler) -> Subscription {
        let shared = Rc::new(Shared {
            client: self.client.clone(),
            timers: self.timers.clone(),
            policy: self.policy.clone(),
            on_event,
            inner: RefCell::new(Inner {
                call_id: call_id.to_string(),
                state: SupervisorState::Connecting,
                attempts: 0,
                generation: 0,
                stream: None,
                timer: None,
            }),
        });
        connect(&shared);
        Subscription { shared }
    }
}

struct Shared {
    client: Rc<StreamClient>,
    timers: Rc<dyn TimerPort>,
    policy: StreamConfig,
    on_event: StreamEventHandler,
    inner: RefCell<Inner>,
}

struct Inner {
    call_id: String,
    state: SupervisorState,
    /// Connections in the current silent run, counting the one that last
    /// carried data
    attempts: u32,
    /// Bumped on every re-arm so a stale timer firing is ignored
    generation: u64,
    stream: Option<StreamHandle>,
    timer: Option<Box<dyn TimerHandle>>,
}

impl Inner {
    fn release(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
    }
}

fn connect(shared: &Rc<Shared>) {
    let call_id = {
        let mut inner = shared.inner.borrow_mut();
        if inner.state.is_terminal() {
            return;
        }
        // Never two live sockets for one call.
        if let Some(mut old) = inner.stream.take() {
            old.close();
        }
        inner.attempts += 1;
        inner.state = SupervisorState::Connecting;
        inner.call_id.clone()
    };

    arm_timer(shared);

    let weak = Rc::downgrade(shared);
    let on_update: UpdateHandler = Rc::new(move |update| {
        if let Some(shared) = weak.upgrade() {
            handle_update(&shared, update);
        }
    });

    match shared.client.open(&call_id, on_update) {
        Ok(handle) => {
            let mut inner = shared.inner.borrow_mut();
            if inner.state.is_terminal() {
                drop(inner);
                drop(handle);
            } else {
                inner.stream = Some(handle);
            }
        }
        Err(e) => {
            // Left to the idle timer to retry.
            log::warn!("Live updates for call {} failed to open: {}", call_id, e);
        }
    }
}

fn arm_timer(shared: &Rc<Shared>) {
    let generation = {
        let mut inner = shared.inner.borrow_mut();
        if inner.state.is_terminal() {
            return;
        }
        if let Some(mut timer) = inner.timer.take() {
            timer.cancel();
        }
        inner.generation += 1;
        inner.generation
    };

    let weak: Weak<Shared> = Rc::downgrade(shared);
    let timer = shared.timers.schedule(
        shared.policy.idle_timeout_ms,
        Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                handle_timeout(&shared, generation);
            }
        }),
    );
    shared.inner.borrow_mut().timer = Some(timer);
}

fn handle_update(shared: &Rc<Shared>, update: TranscriptUpdate) {
    let ended = {
        let mut inner = shared.inner.borrow_mut();
        if inner.state.is_terminal() {
            return;
        }
        inner.attempts = 1;
        if update.is_active {
            inner.state = SupervisorState::Live;
            false
        } else {
            log::info!("Call {} is no longer active, closing live updates", inner.call_id);
            inner.state = SupervisorState::Ended;
            inner.release();
            true
        }
    };

    if !ended {
        arm_timer(shared);
    }
    (shared.on_event)(StreamEvent::Update(update));
    if ended {
        (shared.on_event)(StreamEvent::Ended);
    }
}

fn handle_timeout(shared: &Rc<Shared>, generation: u64) {
    let (call_id, next_attempt, attempts) = {
        let mut inner = shared.inner.borrow_mut();
        if inner.state.is_terminal() || inner.generation != generation {
            return;
        }
        inner.timer = None;
        if let Some(mut stream) = inner.stream.take() {
            stream.close();
        }
        let next = if inner.attempts < shared.policy.max_attempts {
            Some(inner.attempts + 1)
        } else {
            inner.state = SupervisorState::Unavailable;
            None
        };
        (inner.call_id.clone(), next, inner.attempts)
    };

    match next_attempt {
        Some(attempt) => {
            log::info!(
                "No updates for call {}, retrying connection, attempt {} of {}",
                call_id,
                attempt,
                shared.policy.max_attempts
            );
            (shared.on_event)(StreamEvent::Retrying {
                attempt,
                max_attempts: shared.policy.max_attempts,
            });
            connect(shared);
        }
        None => {
            log::warn!(
                "Giving up on live updates for call {} after {} attempts",
                call_id,
                attempts
            );
            (shared.on_event)(StreamEvent::Unavailable(DeskError::StreamUnavailable {
                call_id,
                attempts,
            }));
        }
    }
}

/// Scoped ownership of a supervised stream. `cancel()` or drop stops all
/// timers and closes the connection.
pub struct Subscription {
    shared: Rc<Shared>,
}

impl Subscription {
    pub fn cancel(&self) {
        let mut inner = self.shared.inner.borrow_mut();
        inner.release();
        if !inner.state.is_terminal() {
            log::debug!("Live updates cancelled for call {}", inner.call_id);
            inner.state = SupervisorState::Cancelled;
        }
    }

    pub fn call_id(&self) -> String {
        self.shared.inner.borrow().call_id.clone()
    }

    pub fn state(&self) -> SupervisorState {
        self.shared.inner.borrow().state
    }

    pub fn attempts(&self) -> u32 {
        self.shared.inner.borrow().attempts
    }

    pub fn is_connected(&self) -> bool {
        self.shared
            .inner
            .borrow()
            .stream
            .as_ref()
            .is_some_and(|s| s.is_open())
    }

    pub fn has_pending_timer(&self) -> bool {
        self.shared.inner.borrow().timer.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
