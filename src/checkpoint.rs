//! Checkpoint file: the highest entry ID already notified.

use std::path::{Path, PathBuf};

use log::{info, warn};
use tokio::fs;

use crate::error_handling::CheckpointError;

/// Plain-text file holding one decimal integer.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the checkpoint. A missing, unreadable or malformed file counts
    /// as 0, so the first run notifies every entry.
    pub async fn load(&self) -> u64 {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!("Could not read checkpoint {}: {}", self.path.display(), e);
                return 0;
            }
        };
        match contents.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                warn!(
                    "Checkpoint {} is not a number ({:?}), starting from 0",
                    self.path.display(),
                    contents.trim()
                );
                0
            }
        }
    }

    /// Overwrites the checkpoint.
    pub async fn save(&self, max_id: u64) -> Result<(), CheckpointError> {
        fs::write(&self.path, max_id.to_string())
            .await
            .map_err(|source| CheckpointError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
        info!("Checkpoint updated: {}", max_id);
        Ok(())
    }
}
