//! Conversation message types.

use crate::agent::ORCHESTRATOR_AGENT_ID;
use serde::{Deserialize, Serialize};

/// Sender id used for every user-authored message.
pub const USER_SENDER_ID: &str = "user";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Agent,
}

/// A single message in a conversation.
///
/// While a generation streams into it, `text` only ever grows. Once the
/// message is written to the conversation store it is never mutated again;
/// edits replace it with a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: MessageSender,
    /// `"user"` or the authoring agent's id
    pub sender_id: String,
    /// ISO 8601 timestamp
    pub timestamp: String,
}

impl Message {
    /// Creates a user message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            text: text.into(),
            sender: MessageSender::User,
            sender_id: USER_SENDER_ID.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates an empty agent message, ready to be streamed into.
    pub fn agent(agent_id: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            text: String::new(),
            sender: MessageSender::Agent,
            sender_id: agent_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == MessageSender::User
    }

    pub fn is_agent(&self) -> bool {
        self.sender == MessageSender::Agent
    }

    pub fn is_from_orchestrator(&self) -> bool {
        self.is_agent() && self.sender_id == ORCHESTRATOR_AGENT_ID
    }
}

fn new_message_id() -> String {
    format!("msg-{}", uuid::Uuid::new_v4())
}
