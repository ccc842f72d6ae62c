//! promzy-core: Promzy chat command engine
//!
//! Parses chat commands, keeps per-chat sessions in memory and runs the
//! tic-tac-toe mini-game. Transports (CLI, webhooks, messaging libraries)
//! feed `(sender, chat, text)` into [`Dispatcher::handle`] and deliver the
//! returned reply.

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod game;
pub mod session;

pub use command::{Command, GameCommand, StatusCommand};
pub use config::{BotConfig, Config, PairConfig};
pub use dispatcher::Dispatcher;
pub use error::{CommandError, Error, Result};
pub use game::{Board, GameError, GameState, GameStatus, Mark, MoveOutcome};
pub use session::{AutoStatus, ChatSession, OutgoingMessage, SessionStore};
