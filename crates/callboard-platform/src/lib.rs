//! Browser adapters for the callboard core ports.

pub mod http;
pub mod socket;
pub mod timer;

pub use http::FetchHttp;
pub use socket::BrowserSocket;
pub use timer::BrowserTimers;
