//! Conversation store trait.

use super::message::Message;
use crate::error::Result;
use async_trait::async_trait;

/// Keyed mapping from conversation id to its ordered message sequence.
///
/// Writes are wholesale: `write` replaces the stored sequence with the one
/// given. Callers always pass the complete resulting history, never a delta,
/// so implementations need no merge logic. Last write wins.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Reads a conversation's messages. An unknown id yields an empty sequence.
    async fn read(&self, conversation_id: &str) -> Result<Vec<Message>>;

    /// Overwrites a conversation's messages with `messages`.
    async fn write(&self, conversation_id: &str, messages: &[Message]) -> Result<()>;
}
