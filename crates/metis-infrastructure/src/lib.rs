//! Infrastructure layer for Metisium: file locations, TOML persistence and
//! the concrete stores behind the core traits.

pub mod config_service;
pub mod dto;
pub mod memory_conversation_store;
pub mod paths;
pub mod storage;
pub mod toml_conversation_store;
pub mod toml_project_repository;

pub use crate::config_service::ConfigService;
pub use crate::memory_conversation_store::InMemoryConversationStore;
pub use crate::paths::MetisPaths;
pub use crate::toml_conversation_store::TomlConversationStore;
pub use crate::toml_project_repository::TomlProjectRepository;
