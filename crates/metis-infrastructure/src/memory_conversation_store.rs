//! In-memory `ConversationStore`.

use async_trait::async_trait;
use metis_core::Result;
use metis_core::conversation::{ConversationStore, Message, get_seed_histories};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps every conversation in a map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<String, Vec<Message>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with the shipped seed histories.
    pub fn seeded() -> Self {
        Self {
            conversations: RwLock::new(get_seed_histories()),
        }
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn read(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let conversations = self.conversations.read().await;
        Ok(conversations
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn write(&self, conversation_id: &str, messages: &[Message]) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation_id.to_string(), messages.to_vec());
        tracing::trace!(
            conversation_id,
            message_count = messages.len(),
            "conversation written"
        );
        Ok(())
    }
}
