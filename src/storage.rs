use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info};

use crate::audio::AudioFormat;
use crate::error::{AppError, AppResult};

/// Where a stored file lives, as reported back to the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub path: String,
    pub filename: String,
}

/// Flat audio store rooted at a directory. Batches get one subdirectory
/// named after their base name; nothing but the file names is persisted.
#[derive(Clone, Debug)]
pub struct AudioStore {
    root: PathBuf,
    format: AudioFormat,
}

impl AudioStore {
    pub fn new(root: impl Into<PathBuf>, format: AudioFormat) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn batch_dir(&self, base: &str) -> PathBuf {
        self.root.join(base)
    }

    pub fn indexed_name(&self, base: &str, index: usize) -> String {
        format!("{}{}.{}", base, index, self.format.extension())
    }

    pub fn combined_name(&self, base: &str) -> String {
        format!("{}_combined.{}", base, self.format.extension())
    }

    pub fn timestamped_name(&self) -> String {
        format!(
            "output_{}.{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            self.format.extension()
        )
    }

    pub async fn write_indexed(&self, base: &str, index: usize, bytes: &[u8]) -> AppResult<StoredFile> {
        let name = self.indexed_name(base, index);
        self.write(&self.batch_dir(base), name, bytes).await
    }

    pub async fn write_combined(&self, base: &str, bytes: &[u8]) -> AppResult<StoredFile> {
        let name = self.combined_name(base);
        self.write(&self.batch_dir(base), name, bytes).await
    }

    pub async fn write_timestamped(&self, bytes: &[u8]) -> AppResult<StoredFile> {
        let name = self.timestamped_name();
        self.write(&self.root, name, bytes).await
    }

    async fn write(&self, dir: &Path, filename: String, bytes: &[u8]) -> AppResult<StoredFile> {
        tokio::fs::create_dir_all(dir).await?;
        let full = dir.join(&filename);
        tokio::fs::write(&full, bytes).await?;
        info!("Wrote {} bytes to {}", bytes.len(), full.display());
        Ok(StoredFile {
            path: dir.display().to_string(),
            filename,
        })
    }

    /// `index < 0` selects the combined file of the batch.
    pub fn batch_file(&self, base: &str, index: i64) -> (PathBuf, String) {
        let filename = if index < 0 {
            self.combined_name(base)
        } else {
            self.indexed_name(base, index as usize)
        };
        (self.batch_dir(base).join(&filename), filename)
    }

    pub fn root_file(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Makes `path` absolute and confirms a regular file is there.
    pub async fn locate(&self, path: &Path) -> AppResult<PathBuf> {
        let full = std::path::absolute(path)?;
        match tokio::fs::metadata(&full).await {
            Ok(meta) if meta.is_file() => {
                debug!("Resolved {}", full.display());
                Ok(full)
            }
            _ => Err(AppError::NotFound(full)),
        }
    }
}
