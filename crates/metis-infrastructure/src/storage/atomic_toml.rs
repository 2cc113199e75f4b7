//! Whole-file TOML persistence with atomic replacement.
//!
//! Matches the store's full-snapshot write contract: every save replaces
//! the file's entire content, and readers never observe a half-written file.

use metis_core::{MetisError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A handle to a TOML file holding one value of type `T`.
///
/// - **Atomicity**: saves go to a temporary sibling file that is renamed over
///   the target
/// - **Durability**: the temporary file is fsynced before the rename
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Replaces the file's content with `data`.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| MetisError::io(format!("{:?} has no file name", self.path)))?;

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_missing_and_empty_files_load_as_none() {
        let dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Sample>::new(dir.path().join("sample.toml"));
        assert!(file.load().unwrap().is_none());

        fs::write(file.path(), "   \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("sample.toml");
        let file = AtomicTomlFile::<Sample>::new(path.clone());

        let sample = Sample {
            name: "metis".to_string(),
            count: 3,
        };
        file.save(&sample).unwrap();

        assert_eq!(file.load().unwrap(), Some(sample));
        assert!(!path.with_file_name("sample.toml.tmp").exists());
    }

    #[test]
    fn test_malformed_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Sample>::new(dir.path().join("bad.toml"));
        fs::write(file.path(), "name = ").unwrap();

        let err = file.load().unwrap_err();
        assert!(matches!(err, MetisError::Serialization { .. }));
    }
}
