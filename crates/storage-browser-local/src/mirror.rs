//! A local directory tree served through the remote storage traits.
//!
//! Node hashes are the hex SHA-256 of the node's path relative to the
//! mirror root (`/`-joined); the root itself hashes the empty string.
//! Hashes become resolvable by `hash_lookup` once their parent is listed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use storage_browser_core::{BrowserError, Entry, EntryKind, RemoteFileSystem, StorageClient};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Bytes read per transfer chunk unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Identity hash of the node at `relative_path`.
pub fn node_hash(relative_path: &str) -> String {
    hex::encode(Sha256::digest(relative_path.as_bytes()))
}

fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Mirror of a local directory acting as the remote store.
pub struct MirrorStorage {
    root: PathBuf,
    credentials: Option<(String, String)>,
    chunk_size: usize,
    /// Known nodes: hash -> relative path
    nodes: DashMap<String, String>,
}

impl MirrorStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let nodes = DashMap::new();
        nodes.insert(node_hash(""), String::new());
        Self {
            root: root.into(),
            credentials: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            nodes,
        }
    }

    /// Only accept logins with these credentials.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    fn relative_path(&self, hash: &str) -> Result<String, BrowserError> {
        self.nodes
            .get(hash)
            .map(|p| p.value().clone())
            .ok_or_else(|| BrowserError::Remote(format!("node not found: {}", hash)))
    }

    fn absolute_path(&self, relative: &str) -> PathBuf {
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

#[async_trait]
impl StorageClient for MirrorStorage {
    async fn login(&self, user: &str, password: &str) -> Result<(), BrowserError> {
        match &self.credentials {
            Some((expected_user, expected_password))
                if expected_user != user || expected_password != password =>
            {
                Err(BrowserError::Login(format!("invalid credentials for user {}", user)))
            }
            _ => {
                debug!("Logged in to mirror {} as {:?}", self.root.display(), user);
                Ok(())
            }
        }
    }

    #[instrument(skip(self, node, progress), fields(node = %node.hash), level = "debug")]
    async fn transfer(
        &self,
        node: &Entry,
        destination: &Path,
        progress: Option<mpsc::Sender<usize>>,
    ) -> Result<(), BrowserError> {
        if node.is_directory() {
            return Err(BrowserError::Transfer(format!(
                "cannot transfer a directory: {}",
                node.name
            )));
        }

        let source = self.absolute_path(&self.relative_path(&node.hash)?);
        let mut reader = File::open(&source).await.map_err(|e| {
            BrowserError::Transfer(format!("failed to open {}: {}", source.display(), e))
        })?;
        let mut writer = File::create(destination).await.map_err(|e| {
            BrowserError::Transfer(format!("failed to create {}: {}", destination.display(), e))
        })?;

        let mut buf = vec![0u8; self.chunk_size];
        let mut total = 0u64;
        loop {
            let n = read_chunk(&mut reader, &mut buf).await.map_err(|e| {
                BrowserError::Transfer(format!("failed to read {}: {}", source.display(), e))
            })?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).await.map_err(|e| {
                BrowserError::Transfer(format!(
                    "failed to write {}: {}",
                    destination.display(),
                    e
                ))
            })?;
            total += n as u64;

            if let Some(tx) = &progress {
                if tx.send(n).await.is_err() {
                    warn!("Progress receiver dropped during transfer of {}", node.name);
                }
            }
        }
        writer.flush().await?;

        debug!(
            "Transferred {} bytes from {} to {}",
            total,
            source.display(),
            destination.display()
        );
        Ok(())
    }
}

/// Fill `buf` as far as the source allows; returns 0 only at end of file.
async fn read_chunk<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[async_trait]
impl RemoteFileSystem for MirrorStorage {
    async fn root(&self) -> Result<Entry, BrowserError> {
        Ok(Entry::directory("", node_hash("")))
    }

    #[instrument(skip(self, node), fields(node = %node.hash), level = "debug")]
    async fn list_children(&self, node: &Entry) -> Result<Vec<Entry>, BrowserError> {
        if !node.is_directory() {
            return Err(BrowserError::Remote(format!("not a directory: {}", node.name)));
        }

        let relative = self.relative_path(&node.hash)?;
        let dir = self.absolute_path(&relative);
        let mut read_dir = fs::read_dir(&dir).await.map_err(|e| {
            BrowserError::Remote(format!("failed to read directory {}: {}", dir.display(), e))
        })?;

        let mut entries = Vec::new();
        while let Some(item) = read_dir.next_entry().await? {
            let metadata = match item.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    warn!("Skipping {}: {}", item.path().display(), e);
                    continue;
                }
            };

            let name = item.file_name().to_string_lossy().to_string();
            let child = join_relative(&relative, &name);
            let hash = node_hash(&child);
            self.nodes.insert(hash.clone(), child);

            entries.push(if metadata.is_dir() {
                Entry::directory(name, hash)
            } else {
                Entry::file(name, hash, metadata.len() as i64)
            });
        }

        // Directories first, then by name
        entries.sort_by(|a, b| {
            b.is_directory()
                .cmp(&a.is_directory())
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!("Listed {} entries in {}", entries.len(), dir.display());
        Ok(entries)
    }

    async fn hash_lookup(&self, hash: &str) -> Result<Entry, BrowserError> {
        let relative = self.relative_path(hash)?;
        let path = self.absolute_path(&relative);
        let metadata = fs::metadata(&path).await.map_err(|e| {
            BrowserError::Remote(format!("failed to stat {}: {}", path.display(), e))
        })?;

        let name = relative.rsplit('/').next().unwrap_or_default().to_string();
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let size = match kind {
            EntryKind::File => metadata.len() as i64,
            EntryKind::Directory => 0,
        };

        Ok(Entry {
            name,
            kind,
            hash: hash.to_string(),
            size,
        })
    }
}
