//! promzy-pair: WhatsApp pair-code bot
//!
//! Issues short-lived pairing codes in reply to `!pair`. The WhatsApp session
//! itself lives in an external messaging library that feeds
//! [`IncomingMessage`] events into [`PairBot::handle`].

pub mod bot;
pub mod error;
pub mod message;
pub mod registry;

pub use bot::PairBot;
pub use error::{PairError, Result};
pub use message::IncomingMessage;
pub use registry::{PairCode, PairCodeRegistry};
