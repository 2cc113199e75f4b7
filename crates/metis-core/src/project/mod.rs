//! Project domain module.
//!
//! A project scopes which agents take part in its sub-conversations and what
//! role each of them plays.
//!
//! # Module Structure
//!
//! - `model`: `Project`, `AgentRole`, `SubConversation`
//! - `repository`: Repository trait for project persistence
//! - `preset`: Built-in sample projects

mod model;
mod preset;
mod repository;

pub use model::{AgentRole, DEFAULT_PROJECT_ROLE, Project, SubConversation};
pub use preset::get_default_projects;
pub use repository::ProjectRepository;
