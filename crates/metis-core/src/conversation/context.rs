//! Conversation addressing.

use crate::project::Project;
use serde::{Deserialize, Serialize};

const TITLE_LIMIT: usize = 35;
const TITLE_KEEP: usize = 32;

/// The conversation a turn runs in, with the project that scopes it.
///
/// A conversation is either a free-standing chat (`project == None`) or a
/// sub-conversation of a project. The project is a snapshot: roster edits
/// made afterwards are picked up by the next turn, not the running one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    pub conversation_id: String,
    pub project: Option<Project>,
}

impl ConversationContext {
    pub fn chat(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            project: None,
        }
    }

    pub fn project_thread(project: Project, sub_conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: sub_conversation_id.into(),
            project: Some(project),
        }
    }
}

/// Sidebar entry for a free-standing chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
}

impl ChatSummary {
    /// Starts a new chat titled after its first message.
    pub fn start(first_message: &str) -> Self {
        Self {
            id: format!("chat-{}", chrono::Utc::now().timestamp_millis()),
            title: chat_title_from(first_message),
        }
    }
}

/// Derives a chat title from its first message: messages longer than 35
/// characters are cut to 32 characters followed by "...".
pub fn chat_title_from(text: &str) -> String {
    if text.chars().count() > TITLE_LIMIT {
        let kept: String = text.chars().take(TITLE_KEEP).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_title_is_kept() {
        assert_eq!(chat_title_from("Plan the Q3 launch"), "Plan the Q3 launch");
        let exactly = "a".repeat(35);
        assert_eq!(chat_title_from(&exactly), exactly);
    }

    #[test]
    fn test_long_title_is_truncated() {
        let title = chat_title_from("Write a long blog post about the future of agents");
        assert_eq!(title, "Write a long blog post about the...");
        assert_eq!(title.chars().count(), 35);
    }

    #[test]
    fn test_new_chat_id_prefix() {
        let chat = ChatSummary::start("hello");
        assert!(chat.id.starts_with("chat-"));
        assert_eq!(chat.title, "hello");
    }
}
