//! Observable transcript.
//!
//! The transcript is what the user currently sees: the messages of one
//! conversation, including the live messages of a running generation.
//! Generations only touch it while it still shows their conversation.

use metis_core::conversation::Message;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptView {
    /// `None` before any conversation is opened (a fresh, unsaved chat).
    pub conversation_id: Option<String>,
    pub messages: Vec<Message>,
}

impl TranscriptView {
    fn shows(&self, conversation_id: &str) -> bool {
        self.conversation_id.as_deref() == Some(conversation_id)
    }

    fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }
}

#[derive(Debug)]
pub struct Transcript {
    view: watch::Sender<TranscriptView>,
}

impl Transcript {
    pub fn new() -> Self {
        let (view, _) = watch::channel(TranscriptView::default());
        Self { view }
    }

    pub fn subscribe(&self) -> watch::Receiver<TranscriptView> {
        self.view.subscribe()
    }

    pub fn snapshot(&self) -> TranscriptView {
        self.view.borrow().clone()
    }

    /// Switches the view to a conversation.
    pub fn show(&self, conversation_id: Option<String>, messages: Vec<Message>) {
        self.view.send_replace(TranscriptView {
            conversation_id,
            messages,
        });
    }

    /// Replaces the messages if the view still shows `conversation_id`.
    pub fn refresh(&self, conversation_id: &str, messages: Vec<Message>) -> bool {
        self.view.send_if_modified(|view| {
            if !view.shows(conversation_id) {
                return false;
            }
            view.messages = messages;
            true
        })
    }

    /// Inserts a message at `index`, clamped to the end of the view.
    pub fn insert(&self, conversation_id: &str, index: usize, message: Message) -> bool {
        self.view.send_if_modified(|view| {
            if !view.shows(conversation_id) {
                return false;
            }
            let index = index.min(view.messages.len());
            view.messages.insert(index, message);
            true
        })
    }

    /// Inserts a message `offset` places after the message `anchor_id`.
    ///
    /// The position follows the view rather than the stored history, so
    /// unsaved messages left by a stopped generation keep their place above
    /// the anchor. Without the anchor in view the message is appended.
    pub fn insert_after(
        &self,
        conversation_id: &str,
        anchor_id: &str,
        offset: usize,
        message: Message,
    ) -> bool {
        self.view.send_if_modified(|view| {
            if !view.shows(conversation_id) {
                return false;
            }
            let index = match view.messages.iter().position(|m| m.id == anchor_id) {
                Some(anchor) => (anchor + 1 + offset).min(view.messages.len()),
                None => view.messages.len(),
            };
            view.messages.insert(index, message);
            true
        })
    }

    pub fn push(&self, conversation_id: &str, message: Message) -> bool {
        self.view.send_if_modified(|view| {
            if !view.shows(conversation_id) {
                return false;
            }
            view.messages.push(message);
            true
        })
    }

    /// Appends a streamed fragment to a live message.
    pub fn append_text(&self, conversation_id: &str, message_id: &str, fragment: &str) -> bool {
        self.view.send_if_modified(|view| {
            if !view.shows(conversation_id) {
                return false;
            }
            match view.message_mut(message_id) {
                Some(message) => {
                    message.text.push_str(fragment);
                    true
                }
                None => false,
            }
        })
    }

    pub fn set_text(&self, conversation_id: &str, message_id: &str, text: &str) -> bool {
        self.view.send_if_modified(|view| {
            if !view.shows(conversation_id) {
                return false;
            }
            match view.message_mut(message_id) {
                Some(message) => {
                    message.text = text.to_string();
                    true
                }
                None => false,
            }
        })
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
