//! Session management module
//!
//! Per-chat state kept in memory for the lifetime of the process.

mod store;
mod types;

pub use store::SessionStore;
pub use types::{AutoStatus, ChatSession, OutgoingMessage};
