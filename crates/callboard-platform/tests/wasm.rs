//! WASM-target tests for callboard-platform (Node.js runtime).
//!
//! Exercises the timer adapter and socket error mapping under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! Live HTTP and WebSocket traffic needs a backend and is not covered here.

use wasm_bindgen_test::*;

use std::cell::Cell;
use std::rc::Rc;

use callboard_core::ports::{SleepPort, SocketPort, TimerPort};
use callboard_platform::{BrowserSocket, BrowserTimers};
use callboard_types::DeskError;

// ─── Timer Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
async fn timer_fires_after_delay() {
    let timers = BrowserTimers::new();
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let _handle = timers.schedule(10, Box::new(move || flag.set(true)));
    assert!(!fired.get());
    timers.sleep(50).await;
    assert!(fired.get());
}

#[wasm_bindgen_test]
async fn cancelled_timer_never_fires() {
    let timers = BrowserTimers::new();
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let mut handle = timers.schedule(10, Box::new(move || flag.set(true)));
    handle.cancel();
    handle.cancel();
    timers.sleep(50).await;
    assert!(!fired.get());
}

#[wasm_bindgen_test]
async fn dropped_timer_never_fires() {
    let timers = BrowserTimers::new();
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    drop(timers.schedule(10, Box::new(move || flag.set(true))));
    timers.sleep(50).await;
    assert!(!fired.get());
}

// ─── Socket Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn socket_rejects_invalid_url() {
    let socket = BrowserSocket::new();
    let result = socket.connect("not a url", Rc::new(|_| {}));
    assert!(matches!(result, Err(DeskError::Socket(_))));
}
