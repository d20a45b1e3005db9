use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::BrowserError;

/// Mode used when creating missing destination directories (before umask).
pub const DIRECTORY_MODE: u32 = 0o777;

/// Local filesystem operations used before a download.
#[async_trait]
pub trait LocalFileSystem: Send + Sync {
    /// Whether `path` exists. Failures other than "not found" are errors.
    async fn exists(&self, path: &Path) -> Result<bool, BrowserError>;

    async fn remove_file(&self, path: &Path) -> Result<(), BrowserError>;

    /// Create `path` and all missing parents.
    async fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), BrowserError>;

    fn current_dir(&self) -> Result<PathBuf, BrowserError>;
}
