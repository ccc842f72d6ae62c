//! In-memory chat registry

use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::session::{AutoStatus, ChatSession, OutgoingMessage};

/// Owns every chat session plus the global auto-status flag.
///
/// Created once at startup and handed to the dispatcher. Chats live until the
/// store is dropped.
#[derive(Debug)]
pub struct SessionStore {
    chats: DashMap<String, ChatSession>,
    auto_status: RwLock<AutoStatus>,
    started_at: Instant,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            chats: DashMap::new(),
            auto_status: RwLock::new(AutoStatus::default()),
            started_at: Instant::now(),
        }
    }

    /// Run `f` against the session for `chat_id`, creating it if needed.
    ///
    /// The chat's map entry stays locked for the duration of `f`, so calls
    /// for the same chat never interleave.
    pub fn with_session<R>(&self, chat_id: &str, f: impl FnOnce(&mut ChatSession) -> R) -> R {
        let mut entry = self.chats.entry(chat_id.to_string()).or_insert_with(|| {
            debug!("Creating chat session: {}", chat_id);
            ChatSession::new(chat_id)
        });
        f(entry.value_mut())
    }

    /// Snapshot of a chat session, if it exists
    pub fn get(&self, chat_id: &str) -> Option<ChatSession> {
        self.chats.get(chat_id).map(|s| s.value().clone())
    }

    /// Outgoing messages logged for a chat
    pub fn messages(&self, chat_id: &str) -> Vec<OutgoingMessage> {
        self.chats
            .get(chat_id)
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    pub fn auto_status(&self) -> AutoStatus {
        self.auto_status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Turn auto-status on. The global message is left untouched.
    pub fn enable_auto_status(&self) {
        self.auto_status
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .enabled = true;
    }

    pub fn disable_auto_status(&self) {
        self.auto_status
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .enabled = false;
    }

    /// Time since the store was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_created_lazily() {
        let store = SessionStore::new();
        assert_eq!(store.chat_count(), 0);
        assert!(store.get("chat-1").is_none());

        store.with_session("chat-1", |s| s.add_member("alice"));
        assert_eq!(store.chat_count(), 1);
        assert!(store.get("chat-1").unwrap().members.contains("alice"));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.with_session("chat-1", |s| s.status_message = Some("busy".to_string()));
        store.with_session("chat-2", |s| s.add_member("bob"));

        assert_eq!(
            store.get("chat-1").unwrap().status_message.as_deref(),
            Some("busy")
        );
        assert!(store.get("chat-2").unwrap().status_message.is_none());
    }

    #[test]
    fn test_messages() {
        let store = SessionStore::new();
        assert!(store.messages("chat-1").is_empty());
        store.with_session("chat-1", |s| s.push_message("hello"));
        assert_eq!(store.messages("chat-1").len(), 1);
    }

    #[test]
    fn test_auto_status_toggle() {
        let store = SessionStore::new();
        assert!(!store.auto_status().enabled);

        store.enable_auto_status();
        assert_eq!(
            store.auto_status(),
            AutoStatus { enabled: true, message: String::new() }
        );

        store.disable_auto_status();
        assert!(!store.auto_status().enabled);
    }

    #[test]
    fn test_concurrent_access_to_one_chat() {
        let store = std::sync::Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    store.with_session("chat-1", |s| s.add_member(&format!("user-{}", i)));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get("chat-1").unwrap().members.len(), 8);
    }
}
