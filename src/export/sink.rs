//! Delivery of export artifacts
//!
//! The orchestrator only builds payloads. A sink decides where they go; the
//! CLI writes them into a directory. Failures are returned to the caller,
//! never swallowed or retried.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use super::ExportArtifact;
use crate::error::{ExportError, Result};

/// Destination for finished artifacts
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Deliver one artifact
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Where the artifact ended up
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf>;
}

/// Writes artifacts as `<dir>/<artifact filename>`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        validate_dir(&self.dir)?;
        let path = self.dir.join(&artifact.filename);
        let shown = path.display().to_string();

        let write_failed = |e: std::io::Error| ExportError::WriteFailed {
            path: shown.clone(),
            reason: e.to_string(),
        };

        let file = File::create(&path).await.map_err(write_failed)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&artifact.bytes).await.map_err(write_failed)?;
        writer.flush().await.map_err(write_failed)?;

        debug!("Wrote {} bytes to {}", artifact.bytes.len(), shown);
        info!("Saved {} ({} documents)", shown, artifact.row_count);
        Ok(path)
    }
}

/// Check that the destination directory exists
fn validate_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() && !dir.is_dir() {
        let shown = dir.display().to_string();
        return Err(ExportError::DirectoryNotFound(shown).into());
    }
    Ok(())
}
