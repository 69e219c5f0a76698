//! Inbound message contract from the chat transport

use serde::{Deserialize, Serialize};

/// Where a message came from. Only direct chats are processed; group and
/// broadcast traffic is dropped before it reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    #[default]
    Direct,
    Group,
    Broadcast,
}

/// One message delivered by the transport collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub chat_id: String,
    pub body: String,
    #[serde(default)]
    pub origin: MessageOrigin,
}

impl InboundMessage {
    #[allow(dead_code)] // Constructor for tests and embedding transports
    pub fn direct(chat_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            body: body.into(),
            origin: MessageOrigin::Direct,
        }
    }
}

/// Circumstances under which a transition runs. Captured once per message
/// so the transition itself stays a pure function.
#[derive(Debug, Clone, Copy)]
pub struct ChatContext {
    /// Whether the message arrived inside configured business hours.
    /// Feeds the option-3 status line and the representante confirmation.
    pub within_hours: bool,
}

impl ChatContext {
    pub fn new(within_hours: bool) -> Self {
        Self { within_hours }
    }
}
