//! Inbound message events from the WhatsApp transport

use serde::Deserialize;

use crate::error::Result;

/// A message event as delivered by the messaging library
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    /// Sender address
    pub from: String,
    pub body: String,
    /// Sender's display name, if the library provides one
    #[serde(default, rename = "notifyName")]
    pub notify_name: Option<String>,
    #[serde(default, rename = "isGroupMsg")]
    pub is_group: bool,
    #[serde(default, rename = "isStatus")]
    pub is_status: bool,
}

impl IncomingMessage {
    /// Direct message with no display name
    pub fn direct(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Parse an event from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Display name, defaulting to "User"
    pub fn sender_name(&self) -> &str {
        self.notify_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("User")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PairError;

    #[test]
    fn test_from_json() {
        let msg = IncomingMessage::from_json(
            r#"{"from":"15550001@c.us","body":"!pair","notifyName":"Alice","isGroupMsg":false}"#,
        )
        .unwrap();
        assert_eq!(msg.from, "15550001@c.us");
        assert_eq!(msg.sender_name(), "Alice");
        assert!(!msg.is_group);
        assert!(!msg.is_status);
    }

    #[test]
    fn test_from_json_missing_body() {
        let err = IncomingMessage::from_json(r#"{"from":"15550001@c.us"}"#).unwrap_err();
        assert!(matches!(err, PairError::InvalidPayload(_)));
    }

    #[test]
    fn test_sender_name_default() {
        let msg = IncomingMessage::direct("15550001@c.us", "hi");
        assert_eq!(msg.sender_name(), "User");

        let msg = IncomingMessage {
            notify_name: Some(String::new()),
            ..IncomingMessage::direct("15550001@c.us", "hi")
        };
        assert_eq!(msg.sender_name(), "User");
    }
}
