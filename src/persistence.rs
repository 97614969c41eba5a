//! # Design Persistence
//!
//! The design is saved whole, as JSON, under a caller-chosen key. There is
//! no schema migration: a stored record that no longer parses is treated as
//! a read failure and the caller falls back to the default design.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::design::DesignState;
use crate::error::InsigniaError;

/// Storage collaborator for designs.
pub trait DesignRepository: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load_design(&self, key: &str) -> Result<Option<DesignState>, InsigniaError>;

    fn save_design(&self, key: &str, design: &DesignState) -> Result<(), InsigniaError>;
}

/// Load `key`, falling back to the default design on a miss or any error.
pub fn load_or_default(repository: &dyn DesignRepository, key: &str) -> DesignState {
    match repository.load_design(key) {
        Ok(Some(design)) => design,
        Ok(None) => DesignState::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to load design, using default");
            DesignState::default()
        }
    }
}

/// Keys become file names, so they are restricted to `[A-Za-z0-9_-]`.
pub fn validate_key(key: &str) -> Result<(), InsigniaError> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(InsigniaError::Persistence(format!("invalid design key {:?}", key)))
    }
}

/// In-process store holding serialized designs.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    designs: Mutex<HashMap<String, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw JSON under `key` (bypassing serialization).
    #[cfg(test)]
    fn insert_raw(&self, key: &str, json: impl Into<String>) -> Result<(), InsigniaError> {
        self.lock()?.insert(key.to_string(), json.into());
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, InsigniaError> {
        self.designs
            .lock()
            .map_err(|_| InsigniaError::Persistence("design map lock poisoned".to_string()))
    }
}

impl DesignRepository for MemoryRepository {
    fn load_design(&self, key: &str) -> Result<Option<DesignState>, InsigniaError> {
        let designs = self.lock()?;
        match designs.get(key) {
            Some(json) => serde_json::from_str(json)
                .map(Some)
                .map_err(|e| InsigniaError::Persistence(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    fn save_design(&self, key: &str, design: &DesignState) -> Result<(), InsigniaError> {
        let json = serde_json::to_string(design)?;
        self.lock()?.insert(key.to_string(), json);
        Ok(())
    }
}

/// One `<key>.json` file per design in a directory.
#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, InsigniaError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            InsigniaError::Persistence(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, InsigniaError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl DesignRepository for FileRepository {
    fn load_design(&self, key: &str) -> Result<Option<DesignState>, InsigniaError> {
        let path = self.path_for(key)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(InsigniaError::Persistence(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| InsigniaError::Persistence(format!("{}: {}", path.display(), e)))
    }

    fn save_design(&self, key: &str, design: &DesignState) -> Result<(), InsigniaError> {
        let path = self.path_for(key)?;
        let json = serde_json::to_string_pretty(design)?;
        // Temp file, then rename into place.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| {
                InsigniaError::Persistence(format!("Failed to write {}: {}", path.display(), e))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.load_design("a").unwrap(), None);

        let mut design = DesignState::default();
        design.primary_color = "#ff0000".into();
        repo.save_design("a", &design).unwrap();
        assert_eq!(repo.load_design("a").unwrap(), Some(design));
    }

    #[test]
    fn test_corrupt_record_falls_back_to_default() {
        let repo = MemoryRepository::new();
        repo.insert_raw("broken", "{\"primaryColor\": 12").unwrap();
        assert!(repo.load_design("broken").is_err());
        assert_eq!(load_or_default(&repo, "broken"), DesignState::default());
    }

    #[test]
    fn test_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::open(dir.path().join("designs")).unwrap();
        assert_eq!(repo.load_design("cert-1").unwrap(), None);

        let mut design = DesignState::default();
        design.guilloche_complexity = 4;
        repo.save_design("cert-1", &design).unwrap();
        assert_eq!(repo.load_design("cert-1").unwrap(), Some(design));
        assert!(repo.dir().join("cert-1.json").exists());
    }

    #[test]
    fn test_keys_cannot_escape_directory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::open(dir.path()).unwrap();
        let err = repo
            .save_design("../evil", &DesignState::default())
            .unwrap_err();
        assert!(matches!(err, InsigniaError::Persistence(_)));
        assert!(validate_key("ok_key-1").is_ok());
        assert!(validate_key("").is_err());
    }
}
