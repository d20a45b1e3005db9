use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::download::ProgressDownloader;
use crate::entry::Entry;
use crate::error::BrowserError;
use crate::index;
use crate::remote::{RemoteFileSystem, StorageClient};
use crate::resolve::PathResolver;

pub const DEFAULT_PATH_SEPARATOR: char = '/';

fn default_path_separator() -> char {
    DEFAULT_PATH_SEPARATOR
}

/// Settings for one browser instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub user: String,
    pub password: String,
    /// Name of the top-level remote directory used as the logical root
    pub root_directory_name: String,
    #[serde(default = "default_path_separator")]
    pub path_separator: char,
}

impl BrowserConfig {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        root_directory_name: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            root_directory_name: root_directory_name.into(),
            path_separator: DEFAULT_PATH_SEPARATOR,
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }
}

impl fmt::Debug for BrowserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("root_directory_name", &self.root_directory_name)
            .field("path_separator", &self.path_separator)
            .finish()
    }
}

/// Entry point for path queries and downloads against one remote store.
///
/// The root hash is discovered once by `initialize` and never changes
/// afterwards; build a new browser to start over.
pub struct RepositoryBrowser {
    config: BrowserConfig,
    client: Arc<dyn StorageClient>,
    remote: Arc<dyn RemoteFileSystem>,
    downloader: ProgressDownloader,
    resolver: PathResolver,
    root_hash: OnceLock<String>,
}

impl RepositoryBrowser {
    pub fn new(
        config: BrowserConfig,
        client: Arc<dyn StorageClient>,
        remote: Arc<dyn RemoteFileSystem>,
        downloader: ProgressDownloader,
    ) -> Self {
        let resolver = PathResolver::new(config.path_separator);
        Self {
            config,
            client,
            remote,
            downloader,
            resolver,
            root_hash: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Cached root hash, empty until `initialize` succeeds.
    pub fn root_hash(&self) -> &str {
        self.root_hash.get().map(String::as_str).unwrap_or("")
    }

    pub fn is_initialized(&self) -> bool {
        self.root_hash.get().is_some()
    }

    /// Log in and locate the configured root directory.
    ///
    /// On failure the browser stays uninitialized. Calling this again after
    /// success is a no-op.
    #[instrument(skip(self), fields(root = %self.config.root_directory_name), level = "debug")]
    pub async fn initialize(&self) -> Result<(), BrowserError> {
        if self.is_initialized() {
            debug!("Browser already initialized");
            return Ok(());
        }

        self.client
            .login(&self.config.user, &self.config.password)
            .await?;

        let root = self.remote.root().await?;
        let children = self.remote.list_children(&root).await?;
        let hash = root_node_hash(&children, &self.config.root_directory_name)?;

        info!(
            "Found root directory {} ({})",
            self.config.root_directory_name, hash
        );
        let _ = self.root_hash.set(hash);
        Ok(())
    }

    /// Hash of the file at `path`, relative to the root directory.
    pub async fn get_object_node(&self, path: &str) -> Result<String, BrowserError> {
        let root_hash = self.root_hash.get().ok_or(BrowserError::NotInitialized)?;
        self.resolver
            .resolve(path, root_hash, self.remote.as_ref())
            .await
    }

    /// Download `node` to `local_path`.
    pub async fn update_file(&self, node: &Entry, local_path: &Path) -> Result<(), BrowserError> {
        self.downloader.download_file(node, local_path).await
    }

    /// Resolve `path`, look its node up and download it to `local_path`.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, path: &str, local_path: &Path) -> Result<Entry, BrowserError> {
        let hash = self.get_object_node(path).await?;
        let node = self.remote.hash_lookup(&hash).await?;
        self.update_file(&node, local_path).await?;
        Ok(node)
    }
}

/// Hash of the first directory named `root_name` among the remote root's children.
fn root_node_hash(children: &[Entry], root_name: &str) -> Result<String, BrowserError> {
    index::find_directory(children, root_name).map_err(|_| BrowserError::RootNodeNotFound)
}
