//! Built-in sample projects.

use super::model::{AgentRole, Project, SubConversation};

fn sub(id: &str, title: &str) -> SubConversation {
    SubConversation {
        id: id.to_string(),
        title: title.to_string(),
    }
}

/// Returns the projects available before the user has created any.
pub fn get_default_projects() -> Vec<Project> {
    vec![
        Project {
            id: "proj-1".to_string(),
            name: "Marketing Campaign".to_string(),
            roles: vec![
                AgentRole::new("chatgpt", "Content Writer"),
                AgentRole::new("gemini", "Image Generator & Data Analyst"),
                AgentRole::new("claude", "Strategic Advisor"),
                AgentRole::new("grok", "Social Media Tone Analyst"),
            ],
            sub_conversations: vec![
                sub("proj-1-sc-1", "Instagram Strategy"),
                sub("proj-1-sc-2", "Facebook Ads Copy"),
            ],
        },
        Project {
            id: "proj-2".to_string(),
            name: "Software Development".to_string(),
            roles: vec![
                AgentRole::new("chatgpt", "Code Documentation Writer"),
                AgentRole::new("gemini", "Code Generation & Optimization"),
                AgentRole::new("claude", "Project Architecture Reviewer"),
                AgentRole::new("grok", "User Feedback Summarizer"),
            ],
            sub_conversations: vec![
                sub("proj-2-sc-1", "API Endpoint Design"),
                sub("proj-2-sc-2", "Frontend Component Logic"),
            ],
        },
    ]
}
