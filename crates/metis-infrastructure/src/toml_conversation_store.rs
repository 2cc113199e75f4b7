//! TOML-backed `ConversationStore`.

use crate::dto::ConversationFileV1;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use metis_core::conversation::{ConversationStore, Message, get_seed_histories};
use metis_core::{MetisError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Stores each conversation as its own TOML file.
///
/// ```text
/// conversations/
/// ├── chat-1.toml
/// └── proj-1-sc-1.toml
/// ```
///
/// Every write replaces the whole file, so the last write wins.
pub struct TomlConversationStore {
    dir: PathBuf,
    // Serializes writers so two saves never share a temp file.
    write_lock: Mutex<()>,
}

impl TomlConversationStore {
    /// Opens the store, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Writes the seed histories for conversations that have no file yet.
    pub async fn seed_missing(&self) -> Result<usize> {
        let mut seeded = 0;
        for (conversation_id, messages) in get_seed_histories() {
            if !self.file_for(&conversation_id)?.path().exists() {
                self.write(&conversation_id, &messages).await?;
                seeded += 1;
            }
        }
        if seeded > 0 {
            tracing::info!(count = seeded, dir = ?self.dir, "seeded conversation files");
        }
        Ok(seeded)
    }

    fn file_for(&self, conversation_id: &str) -> Result<AtomicTomlFile<ConversationFileV1>> {
        validate_conversation_id(conversation_id)?;
        Ok(AtomicTomlFile::new(
            self.dir.join(format!("{conversation_id}.toml")),
        ))
    }
}

fn validate_conversation_id(conversation_id: &str) -> Result<()> {
    let invalid = conversation_id.is_empty()
        || conversation_id == "."
        || conversation_id == ".."
        || conversation_id.contains(['/', '\\']);
    if invalid {
        return Err(MetisError::validation(format!(
            "invalid conversation id '{conversation_id}'"
        )));
    }
    Ok(())
}

#[async_trait]
impl ConversationStore for TomlConversationStore {
    async fn read(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let file = self.file_for(conversation_id)?;
        match file.load()? {
            Some(stored) => Ok(stored.into_messages()),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, conversation_id: &str, messages: &[Message]) -> Result<()> {
        let file = self.file_for(conversation_id)?;
        let _guard = self.write_lock.lock().await;
        file.save(&ConversationFileV1::new(conversation_id, messages))
            .map_err(|e| {
                tracing::error!(conversation_id, error = %e, "failed to write conversation");
                MetisError::data_access(format!(
                    "failed to write conversation '{conversation_id}': {e}"
                ))
            })?;
        tracing::debug!(
            conversation_id,
            message_count = messages.len(),
            "conversation saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = TempDir::new().unwrap();
        let store = TomlConversationStore::new(dir.path()).unwrap();

        for id in ["../escape", "a/b", "a\\b", "", ".."] {
            let err = store.read(id).await.unwrap_err();
            assert!(err.is_validation(), "{id} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_seed_missing_skips_existing_files() {
        let dir = TempDir::new().unwrap();
        let store = TomlConversationStore::new(dir.path()).unwrap();

        let custom = vec![Message::user("mine")];
        store.write("chat-1", &custom).await.unwrap();

        let seeded = store.seed_missing().await.unwrap();
        assert_eq!(seeded, get_seed_histories().len() - 1);
        assert_eq!(store.read("chat-1").await.unwrap(), custom);
    }
}
