// src/core/fs_ops.rs
//! File system helpers shared by the upload path and the SQLite store

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::info;

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub async fn ensure_dir_exists(path: &Path) -> io::Result<()> {
        if path.as_os_str().is_empty() || path.exists() {
            return Ok(());
        }
        fs::create_dir_all(path).await?;
        info!("Created directory: {}", path.display());
        Ok(())
    }

    /// Size of a file in bytes, without reading it
    pub async fn file_size(path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path).await?.len())
    }

    pub async fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }

    /// Final path component as UTF-8, if any
    pub fn file_name(path: &Path) -> Option<String> {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }
}
