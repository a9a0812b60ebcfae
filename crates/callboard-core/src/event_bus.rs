//! Simple event bus for decoupled communication between the live-update
//! machinery and view state.
//!
//! The bus is single-threaded (WASM constraint) and uses interior mutability
//! via RefCell. Events are buffered and drained by the presentation layer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use callboard_types::event::DeskEvent;

/// Shared event bus — clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<DeskEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn emit(&self, event: DeskEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<DeskEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    /// Drain only the events about one call, leaving the rest queued.
    pub fn drain_for_call(&self, call_id: &str) -> Vec<DeskEvent> {
        let mut inner = self.inner.borrow_mut();
        let (mine, rest): (VecDeque<_>, VecDeque<_>) = inner
            .drain(..)
            .partition(|e| e.call_id() == Some(call_id));
        *inner = rest;
        mine.into_iter().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
