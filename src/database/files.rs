/*!
 * On-disk content of stored translations.
 *
 * Every artifact is one WebVTT file named after its fingerprint.
 */

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use super::connection::DatabaseConnection;
use crate::file_utils::FileManager;

/// Subdirectory of the data dir holding content files
const DEFAULT_STORAGE_DIRNAME: &str = "subtitles";

/// Directory of translated WebVTT files
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        FileManager::ensure_dir(&root)?;
        Ok(Self { root })
    }

    /// Default location under the application data directory
    pub fn default_storage_dir() -> Result<PathBuf> {
        Ok(DatabaseConnection::default_data_dir()?.join(DEFAULT_STORAGE_DIRNAME))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the content of a fingerprint lives
    pub fn path_for(&self, subtitle_id: &str) -> PathBuf {
        self.root.join(format!("{}.vtt", subtitle_id))
    }

    /// Write content; returns the file path and size in bytes
    pub async fn save(&self, subtitle_id: &str, content: &str) -> Result<(PathBuf, i64)> {
        let path = self.path_for(subtitle_id);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write subtitle file: {:?}", path))?;
        debug!("Wrote {} bytes to {:?}", content.len(), path);
        Ok((path, content.len() as i64))
    }

    /// Read content from a stored path
    pub async fn load<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read subtitle file: {:?}", path))?;
        Ok(crate::file_utils::decode_text(&bytes))
    }

    /// Overwrite content at a stored path; returns the new size in bytes
    pub async fn overwrite<P: AsRef<Path>>(&self, path: P, content: &str) -> Result<i64> {
        let path = path.as_ref();
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write subtitle file: {:?}", path))?;
        Ok(content.len() as i64)
    }

    /// Remove a content file; a missing file is not an error
    pub async fn remove<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove subtitle file: {:?}", path)),
        }
    }
}
