//! Role text resolution.

use crate::agent::Agent;
use crate::project::Project;

/// Role used to describe an agent in the orchestrator instruction when the
/// conversation's project gives it none.
pub const GENERAL_PURPOSE_ROLE: &str = "A general purpose AI assistant.";

/// Canned-response key used for an agent without a project role.
pub const DEFAULT_RESPONSE_KEY: &str = "default";

fn project_role<'a>(agent: &Agent, project: Option<&'a Project>) -> Option<&'a str> {
    project.and_then(|p| p.role_for(&agent.id))
}

/// Role text that frames `agent` inside the combined instruction.
pub fn synthesis_role<'a>(agent: &Agent, project: Option<&'a Project>) -> &'a str {
    project_role(agent, project).unwrap_or(GENERAL_PURPOSE_ROLE)
}

/// Role text used as the canned-response lookup key for a targeted reply.
pub fn response_key<'a>(agent: &Agent, project: Option<&'a Project>) -> &'a str {
    project_role(agent, project).unwrap_or(DEFAULT_RESPONSE_KEY)
}

/// Builds the system instruction for a combined reply: the orchestrator is
/// told which agents it speaks for, one `- Name: role` line each.
pub fn build_orchestrator_instruction(
    orchestrator_name: &str,
    roster: &[Agent],
    project: Option<&Project>,
) -> String {
    let agent_roles = roster
        .iter()
        .map(|agent| format!("- {}: {}", agent.name, synthesis_role(agent, project)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are {orchestrator_name}, an AI orchestrator. Your task is to provide a single, \
         synthesized response to the user's query by considering the perspectives and \
         specializations of the following AI agents:\n\n{agent_roles}\n\nBased on the agents' \
         roles, generate a comprehensive, cohesive response that synthesizes their likely \
         contributions. Do not list what each agent would say. Instead, provide a single, \
         unified answer as the orchestrator."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::get_default_agents;
    use crate::project::{AgentRole, get_default_projects};

    fn claude() -> Agent {
        Agent::new("claude", "Claude", "")
    }

    #[test]
    fn test_project_role_wins() {
        let project = &get_default_projects()[0];
        assert_eq!(synthesis_role(&claude(), Some(project)), "Strategic Advisor");
        assert_eq!(response_key(&claude(), Some(project)), "Strategic Advisor");
    }

    #[test]
    fn test_defaults_without_project_role() {
        assert_eq!(synthesis_role(&claude(), None), GENERAL_PURPOSE_ROLE);
        assert_eq!(response_key(&claude(), None), DEFAULT_RESPONSE_KEY);

        let mut project = get_default_projects()[0].clone();
        project
            .set_roles(vec![AgentRole::new("grok", "Tone Analyst")])
            .unwrap();
        assert_eq!(response_key(&claude(), Some(&project)), DEFAULT_RESPONSE_KEY);
    }

    #[test]
    fn test_instruction_lists_each_agent_once() {
        let roster = get_default_agents();
        let project = &get_default_projects()[1];
        let instruction = build_orchestrator_instruction("Metisium", &roster, Some(project));

        assert!(instruction.starts_with("You are Metisium, an AI orchestrator."));
        assert!(instruction.contains("- Gemini: Code Generation & Optimization\n"));
        assert!(instruction.contains("- Claude: Project Architecture Reviewer\n"));
        assert_eq!(instruction.matches("\n- ").count(), roster.len());
    }

    #[test]
    fn test_instruction_without_project_uses_general_role() {
        let roster = vec![claude()];
        let instruction = build_orchestrator_instruction("Metisium", &roster, None);
        assert!(instruction.contains("- Claude: A general purpose AI assistant."));
    }
}
