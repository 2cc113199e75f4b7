//! Edit-triggered truncation of a conversation history.

use metis_core::conversation::Message;

/// Result of editing one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPlan {
    /// History with the edited message in place and its replies removed.
    pub history: Vec<Message>,
    /// Where the regenerated replies go (right after the edited message).
    pub insert_at: usize,
    /// Number of agent replies that were dropped.
    pub dropped: usize,
}

impl EditPlan {
    pub fn edited_message(&self) -> &Message {
        &self.history[self.insert_at - 1]
    }
}

/// Replaces the text of user message `message_id` and drops the run of
/// agent messages that directly follows it.
///
/// Returns `None` when the id is unknown or names an agent message. Messages
/// after the dropped run are kept untouched.
pub fn truncate_for_edit(messages: &[Message], message_id: &str, new_text: &str) -> Option<EditPlan> {
    let index = messages.iter().position(|m| m.id == message_id)?;
    if !messages[index].is_user() {
        return None;
    }

    let dropped = messages[index + 1..]
        .iter()
        .take_while(|m| m.is_agent())
        .count();

    let mut history = Vec::with_capacity(messages.len() - dropped);
    history.extend_from_slice(&messages[..index]);
    let mut edited = messages[index].clone();
    edited.text = new_text.to_string();
    history.push(edited);
    history.extend_from_slice(&messages[index + 1 + dropped..]);

    Some(EditPlan {
        history,
        insert_at: index + 1,
        dropped,
    })
}
