//! Roster resolution.

use crate::agent::Agent;
use crate::project::Project;

/// Returns the agents in scope for a conversation, in catalog order.
///
/// Free-standing chats see the whole catalog; project conversations see only
/// the agents that hold a role in the project.
pub fn agents_in_scope(catalog: &[Agent], project: Option<&Project>) -> Vec<Agent> {
    match project {
        Some(project) => catalog
            .iter()
            .filter(|agent| project.includes(&agent.id))
            .cloned()
            .collect(),
        None => catalog.to_vec(),
    }
}
