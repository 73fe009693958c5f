use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, error, warn};

use crate::errors::RequestError;

/// An uploaded file staged on local disk for the lifetime of one request.
///
/// The file lives in a private temporary directory under the media dir, so
/// two requests with the same filename never share a path. Dropping the value
/// removes the directory and the file.
#[derive(Debug)]
pub struct TransientFile {
    dir: TempDir,
    path: PathBuf,
}

impl TransientFile {
    /// # Errors
    ///
    /// Returns an error if the media directory or the file cannot be created.
    pub async fn create(
        media_dir: &Path,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Self, RequestError> {
        tokio::fs::create_dir_all(media_dir)
            .await
            .map_err(|e| {
                error!("Failed to create media dir {}: {}", media_dir.display(), e);
                RequestError::Staging(format!("creating media directory: {}", e.kind()))
            })?;

        let dir = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(media_dir)
            .map_err(|e| {
                error!("Failed to create temp dir in {}: {}", media_dir.display(), e);
                RequestError::Staging(format!("creating temp directory: {}", e.kind()))
            })?;
        let path = dir.path().join(filename);

        // `dir` is dropped on the error path, removing anything written so far
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| {
                error!("Failed to write {}: {}", path.display(), e);
                RequestError::Staging(format!("writing file: {}", e.kind()))
            })?;

        debug!("Staged {} bytes at {}", bytes.len(), path.display());
        Ok(Self { dir, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the staged file now, logging instead of failing.
    pub fn close(self) {
        let dir_path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!("Failed to remove {}: {}", dir_path.display(), e);
        }
    }
}
