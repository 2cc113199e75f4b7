//! Path management for Metisium files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/metisium/          # Config directory
//! ├── config.toml              # Engine and model configuration
//! ├── projects.toml            # Projects and their rosters
//! ├── conversations/           # One TOML file per conversation
//! └── logs/                    # Application logs
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "metisium";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for metis_core::MetisError {
    fn from(err: PathError) -> Self {
        metis_core::MetisError::config(err.to_string())
    }
}

/// Resolves every file location from one base directory.
///
/// `MetisPaths::new(None)` uses the platform config directory; tests pass a
/// temporary directory instead.
#[derive(Debug, Clone)]
pub struct MetisPaths {
    base_dir: PathBuf,
}

impl MetisPaths {
    pub fn new(base_dir: Option<&Path>) -> Result<Self, PathError> {
        let base_dir = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::ConfigDirNotFound)?
                .join(APP_DIR),
        };
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    pub fn projects_file(&self) -> PathBuf {
        self.base_dir.join("projects.toml")
    }

    pub fn conversations_dir(&self) -> PathBuf {
        self.base_dir.join("conversations")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base_dir() {
        let paths = MetisPaths::new(Some(Path::new("/tmp/metis-test"))).unwrap();
        assert_eq!(paths.config_file(), Path::new("/tmp/metis-test/config.toml"));
        assert_eq!(
            paths.conversations_dir(),
            Path::new("/tmp/metis-test/conversations")
        );
        assert_eq!(paths.logs_dir(), Path::new("/tmp/metis-test/logs"));
    }
}
