//! View state objects.
//!
//! Each view owns its state explicitly and is handed to whoever renders it.
//! They are read-only projections of facade results and bus events.

pub mod call;
pub mod ticket;
pub mod list;


pub use call::{CallView, StreamStatus};
pub use list::{CallListView, TicketListView};
pub use ticket::TicketView;
