use std::path::{Path, PathBuf};

use async_trait::async_trait;
use storage_browser_core::{BrowserError, LocalFileSystem};
use tokio::fs;

/// `LocalFileSystem` backed by `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LocalFileSystem for TokioFileSystem {
    async fn exists(&self, path: &Path) -> Result<bool, BrowserError> {
        Ok(fs::try_exists(path).await?)
    }

    async fn remove_file(&self, path: &Path) -> Result<(), BrowserError> {
        Ok(fs::remove_file(path).await?)
    }

    async fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), BrowserError> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path).await?;
        Ok(())
    }

    fn current_dir(&self) -> Result<PathBuf, BrowserError> {
        Ok(std::env::current_dir()?)
    }
}
