//! Callboard App — WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the browser adapters, hands them to the core services and
//! exposes the result to the page as `DeskClient`.

mod client;
mod interop;
mod watch;

use wasm_bindgen::prelude::*;

pub use client::DeskClient;
pub use watch::{CallPoll, CallWatch, TicketDesk};

/// WASM entry point — runs once when the module is instantiated
#[wasm_bindgen(start)]
pub fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Callboard WASM starting...");
}
