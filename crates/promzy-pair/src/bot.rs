//! Pair-code bot

use tracing::{error, info};

use crate::message::IncomingMessage;
use crate::registry::PairCodeRegistry;

/// Answers `!pair`, `!help` and `!status` in direct chats
#[derive(Debug, Clone)]
pub struct PairBot {
    registry: PairCodeRegistry,
}

impl PairBot {
    pub fn new(registry: PairCodeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PairCodeRegistry {
        &self.registry
    }

    /// Reply to an incoming message, if it is a known command.
    ///
    /// Group and status broadcasts are ignored.
    pub async fn handle(&self, msg: &IncomingMessage) -> Option<String> {
        if msg.is_group || msg.is_status {
            return None;
        }

        let content = msg.body.trim().to_lowercase();
        match content.as_str() {
            "!pair" => self.pair(msg).await,
            "!help" => Some("Commands: !pair, !help, !status".to_string()),
            "!status" => Some(format!(
                "🤖 Status: Online\nUsers: {}",
                self.registry.user_count().await
            )),
            _ => None,
        }
    }

    async fn pair(&self, msg: &IncomingMessage) -> Option<String> {
        self.registry.purge_expired().await;
        match self.registry.issue(&msg.from, msg.sender_name()).await {
            Ok(code) => {
                info!("Sent pair code to {}", msg.from);
                Some(format!(
                    "✅ PAIR CODE: {}\n⏰ Expires: {} hours",
                    code.code,
                    self.registry.ttl_hours()
                ))
            }
            Err(e) => {
                error!("Failed to issue pair code for {}: {}", msg.from, e);
                None
            }
        }
    }
}
