//! Filesystem resources backing the maintenance responses.
//!
//! Two access policies exist side by side:
//!
//! - [`LoadOnceResource`] is read a single time when the interceptor is
//!   built. Later edits to the file are ignored until the process restarts.
//! - [`PolledResource`] goes back to the filesystem on every access, so
//!   creating, deleting or replacing the file takes effect on the next request.

use std::path::{Path, PathBuf};

use axum::body::Bytes;

use crate::maintenance::error::MaintenanceError;

/// File contents captured once and shared for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct LoadOnceResource {
    path: PathBuf,
    bytes: Bytes,
}

impl LoadOnceResource {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MaintenanceError> {
        let path = path.into();
        let bytes = std::fs::read(&path).map_err(|source| MaintenanceError::Configuration {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            bytes: Bytes::from(bytes),
        })
    }

    /// The captured contents. Cloning `Bytes` only bumps a refcount.
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A path that is re-examined on every access.
#[derive(Debug, Clone)]
pub struct PolledResource {
    path: PathBuf,
}

impl PolledResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Whether the file can be stat'ed right now.
    ///
    /// Any error, including permission denied, counts as absent.
    pub async fn is_present(&self) -> bool {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => true,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::trace!(path = %self.path.display(), error = %err, "stat failed, treating as absent");
                }
                false
            }
        }
    }

    /// Reads the current contents of the file.
    pub async fn read(&self) -> Result<Bytes, MaintenanceError> {
        tokio::fs::read(&self.path)
            .await
            .map(Bytes::from)
            .map_err(|source| MaintenanceError::NotFound {
                path: self.path.clone(),
                source,
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
