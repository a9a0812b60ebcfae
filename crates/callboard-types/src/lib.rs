pub mod call;
pub mod ticket;
pub mod stream;
pub mod event;
pub mod config;
pub mod error;
pub mod fetched;

#[cfg(test)]
mod tests;

pub use error::DeskError;
pub use fetched::Fetched;
pub type Result<T> = std::result::Result<T, DeskError>;
