//! Session types

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::GameState;

/// A reply produced by the bot for one chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Unique message identifier
    pub id: String,
    /// Chat the message was sent to
    pub chat_id: String,
    pub text: String,
    pub time: DateTime<Utc>,
}

impl OutgoingMessage {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            text: text.into(),
            time: Utc::now(),
        }
    }
}

/// Per-chat state
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub chat_id: String,
    /// Everyone who has written to this chat
    pub members: BTreeSet<String>,
    /// Status text set with `.status set`
    pub status_message: Option<String>,
    pub game: Option<GameState>,
    /// Outgoing message log
    pub messages: Vec<OutgoingMessage>,
}

impl ChatSession {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            members: BTreeSet::new(),
            status_message: None,
            game: None,
            messages: Vec::new(),
        }
    }

    /// Record a participant. Returns `true` if they were not seen before.
    pub fn add_member(&mut self, member: &str) -> bool {
        self.members.insert(member.to_string())
    }

    /// Append a reply to the log and return a copy of it
    pub fn push_message(&mut self, text: impl Into<String>) -> OutgoingMessage {
        let message = OutgoingMessage::new(self.chat_id.clone(), text);
        self.messages.push(message.clone());
        message
    }
}

/// Process-wide auto-status flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoStatus {
    pub enabled: bool,
    pub message: String,
}
