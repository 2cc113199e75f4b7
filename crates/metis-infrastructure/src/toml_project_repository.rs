//! TOML-backed `ProjectRepository`.

use crate::dto::ProjectsFileV1;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use metis_core::Result;
use metis_core::project::{Project, ProjectRepository, get_default_projects};
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Keeps every project in a single `projects.toml`.
///
/// The file is read once when the repository is opened. A missing file
/// starts from the built-in sample projects, which are written on the first
/// `save`.
pub struct TomlProjectRepository {
    file: AtomicTomlFile<ProjectsFileV1>,
    projects: RwLock<Vec<Project>>,
}

impl TomlProjectRepository {
    pub fn open(path: PathBuf) -> Result<Self> {
        let file: AtomicTomlFile<ProjectsFileV1> = AtomicTomlFile::new(path);
        let projects = match file.load()? {
            Some(stored) => stored.into_projects()?,
            None => {
                tracing::info!(path = ?file.path(), "no projects file, using sample projects");
                get_default_projects()
            }
        };
        Ok(Self {
            file,
            projects: RwLock::new(projects),
        })
    }
}

#[async_trait]
impl ProjectRepository for TomlProjectRepository {
    async fn find_by_id(&self, project_id: &str) -> Result<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.iter().find(|p| p.id == project_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Project>> {
        Ok(self.projects.read().await.clone())
    }

    async fn save(&self, project: &Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        let mut updated = projects.clone();
        match updated.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project.clone(),
            None => updated.push(project.clone()),
        }

        self.file.save(&ProjectsFileV1::new(&updated))?;
        *projects = updated;
        tracing::debug!(project_id = %project.id, "project saved");
        Ok(())
    }
}
