//! Command dispatcher
//!
//! Maps `(sender, chat, text)` to exactly one reply, applying any session
//! mutation on the way. Malformed input produces a user-facing reply rather
//! than an error.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::command::{self, Command, GameCommand, StatusCommand};
use crate::config::BotConfig;
use crate::error::CommandError;
use crate::game;
use crate::session::{ChatSession, OutgoingMessage, SessionStore};

static GREETING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)hi|hello|hey").expect("greeting pattern is valid"));

const NOT_UNDERSTOOD: &str = "I didn't get that. Try \".menu\"";
const DEFAULT_TAGALL: &str = "Tagging everyone!";

/// Chat command engine
pub struct Dispatcher {
    store: Arc<SessionStore>,
    bot_name: String,
}

impl Dispatcher {
    pub fn new(store: Arc<SessionStore>, config: &BotConfig) -> Self {
        Self {
            store,
            bot_name: config.name.clone(),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Handle one inbound chat line and return the reply that was logged
    pub fn handle(&self, sender: &str, chat_id: &str, text: &str) -> OutgoingMessage {
        let text = text.trim();
        info!("[IN] <- {}@{}: {}", sender, chat_id, text);

        let command = command::parse(text);
        debug!("Parsed command: {}", command.name());

        let message = self.store.with_session(chat_id, |session| {
            session.add_member(sender);
            let reply = match self.execute(&command, sender, text, session) {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Rejected {} from {}: {}", command.name(), sender, e);
                    e.to_string()
                }
            };
            session.push_message(reply)
        });

        info!("[OUT] -> {}: {}", chat_id, message.text);
        message
    }

    fn execute(
        &self,
        command: &Command,
        sender: &str,
        text: &str,
        session: &mut ChatSession,
    ) -> Result<String, CommandError> {
        match command {
            Command::Menu => Ok(self.menu()),
            Command::Alive => Ok(format!(
                "✅ {} is alive! Uptime: {}s",
                self.bot_name,
                self.store.uptime().as_secs()
            )),
            Command::TagAll(msg) => Ok(tag_all(msg, session)),
            Command::Status(status) => self.status(status, session),
            Command::TicTacToe(cmd) => Ok(tictactoe(cmd, sender, session)?),
            Command::Unrecognized => Ok(fallback(sender, text)),
        }
    }

    fn menu(&self) -> String {
        format!(
            "📋 {} Menu\n\n\
             Commands:\n\
             .menu\n\
             .alive\n\
             .tagall <msg>\n\
             .tictactoe start\n\
             .tictactoe join\n\
             .tictactoe move <1-9>\n\
             .status set <msg>\n\
             .status auto on/off",
            self.bot_name
        )
    }

    fn status(
        &self,
        command: &StatusCommand,
        session: &mut ChatSession,
    ) -> Result<String, CommandError> {
        match command {
            StatusCommand::Set(text) if text.is_empty() => Err(CommandError::InvalidArgument(
                "Usage: .status set <text>".to_string(),
            )),
            StatusCommand::Set(text) => {
                session.status_message = Some(text.clone());
                Ok(format!("Status for this chat set to: \"{}\"", text))
            }
            StatusCommand::Auto(true) => {
                self.store.enable_auto_status();
                Ok("Auto-status enabled globally.".to_string())
            }
            StatusCommand::Auto(false) => {
                self.store.disable_auto_status();
                Ok("Auto-status disabled globally.".to_string())
            }
            StatusCommand::Show => Ok(format!(
                "Status: \"{}\"",
                session.status_message.as_deref().unwrap_or("not set")
            )),
        }
    }
}

fn tag_all(msg: &str, session: &ChatSession) -> String {
    let msg = if msg.is_empty() { DEFAULT_TAGALL } else { msg };
    let mentions = session
        .members
        .iter()
        .map(|m| format!("@{}", m))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}\n\n{}", msg, mentions)
}

fn tictactoe(
    command: &GameCommand,
    sender: &str,
    session: &mut ChatSession,
) -> Result<String, game::GameError> {
    let current = session.game.as_ref();
    let (next, reply) = match command {
        GameCommand::Start => {
            let next = game::start(current, sender)?;
            let reply = game::render_started(&next);
            (next, reply)
        }
        GameCommand::Join => {
            let next = game::join(current, sender)?;
            let reply = game::render_joined(&next, sender);
            (next, reply)
        }
        GameCommand::Move(position) => {
            let (next, outcome) = game::play(current, sender, position.as_deref())?;
            let reply = game::render_move(&next, &outcome);
            (next, reply)
        }
    };
    session.game = Some(next);
    Ok(reply)
}

fn fallback(sender: &str, text: &str) -> String {
    if GREETING.is_match(text) {
        format!("Hello @{} 👋", sender)
    } else {
        NOT_UNDERSTOOD.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(SessionStore::new()), &BotConfig::default())
    }

    fn reply(d: &Dispatcher, sender: &str, text: &str) -> String {
        d.handle(sender, "chat-1", text).text
    }

    #[test]
    fn test_menu() {
        let d = dispatcher();
        let text = reply(&d, "alice", ".menu");
        assert!(text.starts_with("📋 Promzy v1 Menu"));
        assert!(text.contains(".tictactoe move <1-9>"));
        assert!(text.contains(".status auto on/off"));
    }

    #[test]
    fn test_alive_reports_uptime() {
        let d = dispatcher();
        let text = reply(&d, "alice", ".alive");
        assert!(text.starts_with("✅ Promzy v1 is alive! Uptime: "));
        assert!(text.ends_with('s'));
    }

    #[test]
    fn test_custom_bot_name() {
        let config = BotConfig {
            name: "TestBot".to_string(),
        };
        let d = Dispatcher::new(Arc::new(SessionStore::new()), &config);
        assert!(reply(&d, "alice", ".alive").contains("TestBot is alive"));
    }

    #[test]
    fn test_tagall_mentions_members() {
        let d = dispatcher();
        reply(&d, "alice", "hi");
        reply(&d, "bob", "hi");
        let text = reply(&d, "alice", ".tagall hello");
        assert_eq!(text, "hello\n\n@alice @bob");
    }

    #[test]
    fn test_tagall_default_text() {
        let d = dispatcher();
        let text = reply(&d, "alice", ".tagall");
        assert_eq!(text, "Tagging everyone!\n\n@alice");
    }

    #[test]
    fn test_status_set_and_show() {
        let d = dispatcher();
        assert_eq!(reply(&d, "alice", ".status"), "Status: \"not set\"");
        assert_eq!(
            reply(&d, "alice", ".status set in a meeting"),
            "Status for this chat set to: \"in a meeting\""
        );
        assert_eq!(reply(&d, "bob", ".status"), "Status: \"in a meeting\"");
        assert_eq!(d.handle("bob", "chat-2", ".status").text, "Status: \"not set\"");
    }

    #[test]
    fn test_status_set_without_text_is_rejected() {
        let d = dispatcher();
        assert_eq!(reply(&d, "alice", ".status set"), "Usage: .status set <text>");
        assert!(d.store().get("chat-1").unwrap().status_message.is_none());
    }

    #[test]
    fn test_status_unknown_args_fall_back_to_show() {
        let d = dispatcher();
        reply(&d, "alice", ".status set busy");
        assert_eq!(reply(&d, "alice", ".status whatever"), "Status: \"busy\"");
        assert_eq!(reply(&d, "alice", ".status auto sometimes"), "Status: \"busy\"");
    }

    #[test]
    fn test_status_auto_toggle() {
        let d = dispatcher();
        assert_eq!(reply(&d, "alice", ".status auto on"), "Auto-status enabled globally.");
        assert!(d.store().auto_status().enabled);
        assert_eq!(reply(&d, "alice", ".status auto off"), "Auto-status disabled globally.");
        assert!(!d.store().auto_status().enabled);
    }

    #[test]
    fn test_auto_status_does_not_leak_between_chats() {
        let d = dispatcher();
        reply(&d, "alice", ".status set secret plans");
        reply(&d, "alice", ".status auto on");

        assert_eq!(d.handle("bob", "chat-2", ".status").text, "Status: \"not set\"");
        assert_eq!(reply(&d, "alice", ".status"), "Status: \"secret plans\"");
        assert!(d.store().auto_status().message.is_empty());
    }

    #[test]
    fn test_greeting_fallback() {
        let d = dispatcher();
        assert_eq!(reply(&d, "alice", "Hello there"), "Hello @alice 👋");
        assert_eq!(reply(&d, "alice", "HEY"), "Hello @alice 👋");
        assert_eq!(reply(&d, "alice", "good morning"), NOT_UNDERSTOOD);
        assert_eq!(reply(&d, "alice", ".tictactoe dance"), NOT_UNDERSTOOD);
    }

    #[test]
    fn test_every_reply_is_logged() {
        let d = dispatcher();
        reply(&d, "alice", ".menu");
        reply(&d, "alice", "???");
        reply(&d, "alice", ".tictactoe move 1");
        assert_eq!(d.store().messages("chat-1").len(), 3);
    }

    #[test]
    fn test_tictactoe_occupied_cell_leaves_state_unchanged() {
        let d = dispatcher();
        reply(&d, "alice", ".tictactoe start");
        reply(&d, "bob", ".tictactoe join");
        reply(&d, "alice", ".tictactoe move 1");
        let before = d.store().get("chat-1").unwrap().game;

        assert_eq!(reply(&d, "bob", ".tictactoe move 1"), "Invalid move.");
        assert_eq!(d.store().get("chat-1").unwrap().game, before);
    }

    #[test]
    fn test_tictactoe_start_rejected_while_active() {
        let d = dispatcher();
        reply(&d, "alice", ".tictactoe start");
        assert_eq!(reply(&d, "bob", ".tictactoe start"), "A game is already active.");
        let game = d.store().get("chat-1").unwrap().game.unwrap();
        assert_eq!(game.players, vec!["alice".to_string()]);
    }

    #[test]
    fn test_tictactoe_join_full() {
        let d = dispatcher();
        reply(&d, "alice", ".tictactoe start");
        reply(&d, "bob", ".tictactoe join");
        assert_eq!(reply(&d, "carol", ".tictactoe join"), "Game already has two players.");
    }

    #[test]
    fn test_tictactoe_win() {
        let d = dispatcher();
        reply(&d, "alice", ".tictactoe start");
        reply(&d, "bob", ".tictactoe join");
        for (player, pos) in [("alice", 1), ("bob", 4), ("alice", 2), ("bob", 5)] {
            reply(&d, player, &format!(".tictactoe move {}", pos));
        }
        let text = reply(&d, "alice", ".tictactoe move 3");
        assert_eq!(text, "X | X | X\nO | O | 6\n7 | 8 | 9\n\n🏆 Winner: @alice");

        let game = d.store().get("chat-1").unwrap().game.unwrap();
        assert!(matches!(game.status, GameStatus::Won { ref winner, .. } if winner == "alice"));
        assert_eq!(reply(&d, "bob", ".tictactoe move 9"), "No active game.");
    }

    #[test]
    fn test_tictactoe_games_are_per_chat() {
        let d = dispatcher();
        reply(&d, "alice", ".tictactoe start");
        assert_eq!(
            d.handle("alice", "chat-2", ".tictactoe move 1").text,
            "No active game."
        );
    }
}
