//! Application layer for Metisium: the generation engine and the chat
//! session that drives it.

pub mod chat_session;
pub mod coordinator;
pub mod generation;
pub mod history_editor;
pub mod transcript;

pub use chat_session::{ChatSession, EditOutcome, SendOutcome};
pub use coordinator::{GenerationCoordinator, GenerationOutcome, HistorySnapshot};
pub use generation::{Generation, GenerationCounter, LivenessToken};
pub use history_editor::{EditPlan, truncate_for_edit};
pub use transcript::{Transcript, TranscriptView};
