//! Agent domain module.
//!
//! # Module Structure
//!
//! - `model`: The `Agent` identity and the reserved orchestrator
//! - `preset`: The built-in agent catalog

mod model;
mod preset;

pub use model::{Agent, ORCHESTRATOR_AGENT_ID};
pub use preset::get_default_agents;
