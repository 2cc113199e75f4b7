//! Project repository trait.

use super::model::Project;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for project configurations.
///
/// Projects supply the roster and role text the generation engine reads.
/// The engine only reads them; edits go through `save`.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Finds a project by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Project))`: Project found
    /// - `Ok(None)`: Project not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, project_id: &str) -> Result<Option<Project>>;

    /// Lists all projects in their stored order.
    async fn list_all(&self) -> Result<Vec<Project>>;

    /// Inserts or replaces a project.
    async fn save(&self, project: &Project) -> Result<()>;
}
