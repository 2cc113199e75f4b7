//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: `Message` and `MessageSender`
//! - `context`: which conversation a turn belongs to (`ConversationContext`, `ChatSummary`)
//! - `store`: the `ConversationStore` trait (full-snapshot writes)
//! - `preset`: seed histories shipped with the application

mod context;
mod message;
mod preset;
mod store;

pub use context::{ChatSummary, ConversationContext, chat_title_from};
pub use message::{Message, MessageSender};
pub use preset::{get_seed_chats, get_seed_histories};
pub use store::ConversationStore;
