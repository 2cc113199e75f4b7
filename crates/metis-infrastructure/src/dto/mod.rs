//! Persistence DTOs.
//!
//! Files store these types; the rest of the workspace only sees the domain
//! models they convert to and from.

mod conversation;
mod project;

pub use conversation::{CONVERSATION_FILE_VERSION, ConversationFileV1, MessageDto, MessageSenderDto};
pub use project::{AgentRoleDto, PROJECTS_FILE_VERSION, ProjectDto, ProjectsFileV1, SubConversationDto};
