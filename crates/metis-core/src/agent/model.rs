//! Agent domain model.

use serde::{Deserialize, Serialize};

/// Identifier of the synthetic agent that speaks for the whole roster in
/// combined mode.
pub const ORCHESTRATOR_AGENT_ID: &str = "metisium";

const ORCHESTRATOR_NAME: &str = "Metisium";
const ORCHESTRATOR_AVATAR: &str = "https://i.imgur.com/v1hDKa8.png";

/// An agent that can be addressed with `@name` and answer in a conversation.
///
/// Agents are immutable identities. Their behavior comes from the role text a
/// project assigns to them, not from the agent itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable identifier (e.g. "claude")
    pub id: String,
    /// Display name, matched case-insensitively against `@mentions`
    pub name: String,
    /// URL or path of the avatar image
    pub avatar: String,
}

impl Agent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
        }
    }

    /// The reserved orchestrator agent. Never part of a configurable roster.
    pub fn orchestrator() -> Self {
        Self::new(ORCHESTRATOR_AGENT_ID, ORCHESTRATOR_NAME, ORCHESTRATOR_AVATAR)
    }

    pub fn is_orchestrator(&self) -> bool {
        self.id == ORCHESTRATOR_AGENT_ID
    }

    /// Returns true if `token` (already lowercased) addresses this agent.
    pub fn answers_to(&self, token: &str) -> bool {
        self.name.to_lowercase() == token
    }
}
