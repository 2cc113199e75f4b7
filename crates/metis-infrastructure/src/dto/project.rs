//! Project file DTOs.

use metis_core::project::{AgentRole, Project, SubConversation};
use metis_core::{MetisError, Result};
use serde::{Deserialize, Serialize};

pub const PROJECTS_FILE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRoleDto {
    pub agent_id: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubConversationDto {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDto {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "role")]
    pub roles: Vec<AgentRoleDto>,
    #[serde(default, rename = "sub_conversation")]
    pub sub_conversations: Vec<SubConversationDto>,
}

/// On-disk layout of `projects.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsFileV1 {
    pub schema_version: String,
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectDto>,
}

impl ProjectsFileV1 {
    pub fn new(projects: &[Project]) -> Self {
        Self {
            schema_version: PROJECTS_FILE_VERSION.to_string(),
            projects: projects.iter().map(ProjectDto::from).collect(),
        }
    }

    /// Converts every project, rejecting the file if any roster is invalid.
    pub fn into_projects(self) -> Result<Vec<Project>> {
        self.projects.into_iter().map(Project::try_from).collect()
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Convert a stored project to the domain model, re-checking role uniqueness.
impl TryFrom<ProjectDto> for Project {
    type Error = MetisError;

    fn try_from(dto: ProjectDto) -> Result<Self> {
        let mut project = Project {
            id: dto.id,
            name: dto.name,
            roles: Vec::new(),
            sub_conversations: dto
                .sub_conversations
                .into_iter()
                .map(|sc| SubConversation {
                    id: sc.id,
                    title: sc.title,
                })
                .collect(),
        };
        project.set_roles(
            dto.roles
                .into_iter()
                .map(|r| AgentRole::new(r.agent_id, r.role))
                .collect(),
        )?;
        Ok(project)
    }
}

impl From<&Project> for ProjectDto {
    fn from(project: &Project) -> Self {
        ProjectDto {
            id: project.id.clone(),
            name: project.name.clone(),
            roles: project
                .roles
                .iter()
                .map(|r| AgentRoleDto {
                    agent_id: r.agent_id.clone(),
                    role: r.role.clone(),
                })
                .collect(),
            sub_conversations: project
                .sub_conversations
                .iter()
                .map(|sc| SubConversationDto {
                    id: sc.id.clone(),
                    title: sc.title.clone(),
                })
                .collect(),
        }
    }
}
