//! Turn routing.
//!
//! Decides who answers a user message: the orchestrator alone (combined),
//! every agent in scope (broadcast), or the agents named with `@mentions`
//! (targeted). Also resolves the roster in scope and each agent's role text.
//!
//! # Module Structure
//!
//! - `mention`: `@mention` extraction and the resulting `Route`
//! - `roster`: agents in scope for a conversation
//! - `role`: role text resolution and the orchestrator instruction

mod mention;
mod role;
mod roster;

pub use mention::{EVERYONE_TOKEN, GenerationMode, Route, parse_mentions};
pub use role::{
    DEFAULT_RESPONSE_KEY, GENERAL_PURPOSE_ROLE, build_orchestrator_instruction, response_key,
    synthesis_role,
};
pub use roster::agents_in_scope;
