//! File-backed key-value store
//!
//! Each key is a JSON file under the data directory. Writes go through a
//! temp file and a rename so a crash never leaves a half-written value.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{PersistenceBackend, PersistenceError};

/// Application directory name under the platform data dir
const APP_DIR: &str = "promptcraft";

/// Default data directory, e.g. `~/.local/share/promptcraft`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under [`default_data_dir`]
    pub fn at_default_location() -> Self {
        Self::new(default_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistenceError::WriteFailed {
                key: key.to_string(),
                message: "key must be alphanumeric".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    // Settings hold API keys
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl PersistenceBackend for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let write_err = |e: std::io::Error| PersistenceError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).await.map_err(write_err)?;
        restrict_permissions(&temp_path).await.map_err(write_err)?;
        fs::rename(&temp_path, &path).await.map_err(write_err)?;

        debug!(path = %path.display(), "Value saved");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
