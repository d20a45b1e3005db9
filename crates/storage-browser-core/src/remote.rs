use std::path::Path;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::entry::Entry;
use crate::error::BrowserError;

/// Session-level operations of the remote storage service.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Authenticate the session.
    async fn login(&self, user: &str, password: &str) -> Result<(), BrowserError>;

    /// Copy the bytes of `node` to the absolute path `destination`.
    ///
    /// When `progress` is given, the length of every received chunk is sent
    /// on it. The sender is dropped when this returns, which closes the
    /// progress stream whether the transfer succeeded or not.
    async fn transfer(
        &self,
        node: &Entry,
        destination: &Path,
        progress: Option<mpsc::Sender<usize>>,
    ) -> Result<(), BrowserError>;
}

/// Node-tree operations of the remote storage service.
#[async_trait]
pub trait RemoteFileSystem: Send + Sync {
    /// The top-level node of the remote store.
    async fn root(&self) -> Result<Entry, BrowserError>;

    /// Children of a directory node, in the order the remote returns them.
    async fn list_children(&self, node: &Entry) -> Result<Vec<Entry>, BrowserError>;

    /// The node identified by `hash`.
    async fn hash_lookup(&self, hash: &str) -> Result<Entry, BrowserError>;
}

/// Lists the children of the node identified by a hash.
///
/// This is the only capability `PathResolver` needs.
#[async_trait]
pub trait ChildLister: Send + Sync {
    async fn list_children_of(&self, hash: &str) -> Result<Vec<Entry>, BrowserError>;
}

/// Every remote filesystem can list by hash: look the node up, then list it.
#[async_trait]
impl<T: RemoteFileSystem + ?Sized> ChildLister for T {
    async fn list_children_of(&self, hash: &str) -> Result<Vec<Entry>, BrowserError> {
        let node = self.hash_lookup(hash).await?;
        self.list_children(&node).await
    }
}
