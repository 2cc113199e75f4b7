//! Conversation file DTOs.

use metis_core::conversation::{Message, MessageSender};
use serde::{Deserialize, Serialize};

pub const CONVERSATION_FILE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSenderDto {
    User,
    Agent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub text: String,
    pub sender: MessageSenderDto,
    pub sender_id: String,
    pub timestamp: String,
}

/// On-disk layout of one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationFileV1 {
    pub schema_version: String,
    pub conversation_id: String,
    #[serde(default, rename = "message")]
    pub messages: Vec<MessageDto>,
}

impl ConversationFileV1 {
    pub fn new(conversation_id: &str, messages: &[Message]) -> Self {
        Self {
            schema_version: CONVERSATION_FILE_VERSION.to_string(),
            conversation_id: conversation_id.to_string(),
            messages: messages.iter().map(MessageDto::from).collect(),
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages.into_iter().map(Message::from).collect()
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl From<MessageSenderDto> for MessageSender {
    fn from(dto: MessageSenderDto) -> Self {
        match dto {
            MessageSenderDto::User => MessageSender::User,
            MessageSenderDto::Agent => MessageSender::Agent,
        }
    }
}

impl From<MessageSender> for MessageSenderDto {
    fn from(sender: MessageSender) -> Self {
        match sender {
            MessageSender::User => MessageSenderDto::User,
            MessageSender::Agent => MessageSenderDto::Agent,
        }
    }
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Message {
            id: dto.id,
            text: dto.text,
            sender: dto.sender.into(),
            sender_id: dto.sender_id,
            timestamp: dto.timestamp,
        }
    }
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        MessageDto {
            id: message.id.clone(),
            text: message.text.clone(),
            sender: message.sender.into(),
            sender_id: message.sender_id.clone(),
            timestamp: message.timestamp.clone(),
        }
    }
}
