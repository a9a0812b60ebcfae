pub mod ports;
pub mod event_bus;
pub mod merge;
pub mod stream;
pub mod supervisor;
pub mod facade;
pub mod poller;
pub mod filter;
