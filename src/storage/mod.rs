//! Document Store
//!
//! Uploaded documents are written to a local directory under a generated
//! name and removed by the worker once the job reaches a terminal state.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::types::AppResult;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

/// A document written by [`DocumentStore::save`].
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: Uuid,
    pub path: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save(&self, data: &[u8]) -> AppResult<StoredDocument> {
        fs::create_dir_all(&self.root).await?;

        let id = Uuid::new_v4();
        let path = self.root.join(format!("financial_document_{}.pdf", id));
        fs::write(&path, data).await?;

        debug!(path = %path.display(), size = data.len(), "Stored uploaded document");
        Ok(StoredDocument { id, path })
    }
}

/// Removes the wrapped file when dropped, so every exit path of a job
/// (success, error, panic) cleans up its upload.
#[derive(Debug)]
pub struct DocumentGuard {
    path: PathBuf,
}

impl DocumentGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DocumentGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary document"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove temporary document"),
        }
    }
}
