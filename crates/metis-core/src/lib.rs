//! Domain layer for Metisium.
//!
//! Holds the models the generation engine works with (agents, projects,
//! messages), the store and repository traits it writes through, and the
//! pure routing logic that decides who answers a message.

pub mod agent;
pub mod config;
pub mod conversation;
pub mod error;
pub mod project;
pub mod response;
pub mod routing;

// Re-export common error type
pub use error::{MetisError, Result};
