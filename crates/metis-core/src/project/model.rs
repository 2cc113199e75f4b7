//! Project domain model.

use crate::error::{MetisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role text given to agents that join a project without an explicit role.
pub const DEFAULT_PROJECT_ROLE: &str = "You are a helpful assistant.";

/// Per-project behavioral description of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRole {
    pub agent_id: String,
    pub role: String,
}

impl AgentRole {
    pub fn new(agent_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            role: role.into(),
        }
    }
}

/// A conversation thread that belongs to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubConversation {
    pub id: String,
    pub title: String,
}

/// A project: a named roster of agents with roles, plus its conversations.
///
/// The roster is defined by `roles`: an agent is in scope for the project's
/// conversations exactly when it has a role entry. At most one entry exists
/// per agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub roles: Vec<AgentRole>,
    pub sub_conversations: Vec<SubConversation>,
}

impl Project {
    /// Creates a project whose selected agents all start with the default
    /// role, with a single "General" sub-conversation.
    pub fn create(name: impl Into<String>, agent_ids: &[String]) -> Result<Self> {
        let id = format!("proj-{}", chrono::Utc::now().timestamp_millis());
        let roles = agent_ids
            .iter()
            .map(|agent_id| AgentRole::new(agent_id.clone(), DEFAULT_PROJECT_ROLE))
            .collect::<Vec<_>>();
        validate_roles(&roles)?;

        Ok(Self {
            sub_conversations: vec![SubConversation {
                id: format!("{id}-sc-1"),
                title: "General".to_string(),
            }],
            id,
            name: name.into(),
            roles,
        })
    }

    /// Returns this project's role text for an agent, if it has one.
    pub fn role_for(&self, agent_id: &str) -> Option<&str> {
        self.roles
            .iter()
            .find(|r| r.agent_id == agent_id)
            .map(|r| r.role.as_str())
    }

    /// Returns true if the agent belongs to this project's roster.
    pub fn includes(&self, agent_id: &str) -> bool {
        self.roles.iter().any(|r| r.agent_id == agent_id)
    }

    /// Replaces all roles at once.
    ///
    /// # Errors
    ///
    /// Returns `MetisError::Validation` if two entries name the same agent.
    pub fn set_roles(&mut self, roles: Vec<AgentRole>) -> Result<()> {
        validate_roles(&roles)?;
        self.roles = roles;
        Ok(())
    }

    /// Adds agents with the default role. Agents already on the roster are skipped.
    pub fn add_agents(&mut self, agent_ids: &[String]) {
        for agent_id in agent_ids {
            if !self.includes(agent_id) {
                self.roles
                    .push(AgentRole::new(agent_id.clone(), DEFAULT_PROJECT_ROLE));
            }
        }
    }

    pub fn sub_conversation(&self, sub_conversation_id: &str) -> Option<&SubConversation> {
        self.sub_conversations
            .iter()
            .find(|sc| sc.id == sub_conversation_id)
    }
}

fn validate_roles(roles: &[AgentRole]) -> Result<()> {
    let mut seen = HashSet::new();
    for role in roles {
        if !seen.insert(role.agent_id.as_str()) {
            return Err(MetisError::validation(format!(
                "agent '{}' has more than one role in the project",
                role.agent_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_create_assigns_default_roles_and_general_thread() {
        let project = Project::create("Launch", &ids(&["claude", "grok"])).unwrap();

        assert_eq!(project.roles.len(), 2);
        assert_eq!(project.role_for("claude"), Some(DEFAULT_PROJECT_ROLE));
        assert_eq!(project.sub_conversations.len(), 1);
        assert_eq!(project.sub_conversations[0].title, "General");
        assert_eq!(
            project.sub_conversations[0].id,
            format!("{}-sc-1", project.id)
        );
    }

    #[test]
    fn test_create_rejects_duplicate_agents() {
        let err = Project::create("Dup", &ids(&["claude", "claude"])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_set_roles_enforces_uniqueness() {
        let mut project = Project::create("Launch", &ids(&["claude"])).unwrap();

        let result = project.set_roles(vec![
            AgentRole::new("gemini", "Analyst"),
            AgentRole::new("gemini", "Writer"),
        ]);
        assert!(result.is_err());
        // Failed update leaves the roster untouched
        assert_eq!(project.role_for("claude"), Some(DEFAULT_PROJECT_ROLE));

        project
            .set_roles(vec![AgentRole::new("gemini", "Analyst")])
            .unwrap();
        assert!(!project.includes("claude"));
        assert_eq!(project.role_for("gemini"), Some("Analyst"));
    }

    #[test]
    fn test_add_agents_skips_existing() {
        let mut project = Project::create("Launch", &ids(&["claude"])).unwrap();
        project
            .set_roles(vec![AgentRole::new("claude", "Strategic Advisor")])
            .unwrap();

        project.add_agents(&ids(&["claude", "grok"]));

        assert_eq!(project.roles.len(), 2);
        assert_eq!(project.role_for("claude"), Some("Strategic Advisor"));
        assert_eq!(project.role_for("grok"), Some(DEFAULT_PROJECT_ROLE));
    }
}
