//! Hand-written collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::download::ProgressOutput;
use crate::entry::Entry;
use crate::error::BrowserError;
use crate::local::LocalFileSystem;
use crate::remote::{ChildLister, RemoteFileSystem, StorageClient};

fn io_error(message: &str) -> BrowserError {
    BrowserError::Io(io::Error::other(message.to_string()))
}

/// Listing keyed by hash, recording every call.
#[derive(Default)]
pub struct ScriptedLister {
    listings: HashMap<String, Vec<Entry>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hash: &str, entries: Vec<Entry>) -> Self {
        self.listings.insert(hash.to_string(), entries);
        self
    }

    pub fn failing(mut self, hash: &str) -> Self {
        self.failing.insert(hash.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChildLister for ScriptedLister {
    async fn list_children_of(&self, hash: &str) -> Result<Vec<Entry>, BrowserError> {
        self.calls.lock().unwrap().push(hash.to_string());
        if self.failing.contains(hash) {
            return Err(BrowserError::Remote("mock get children error".to_string()));
        }
        self.listings
            .get(hash)
            .cloned()
            .ok_or_else(|| BrowserError::Remote(format!("node not found: {}", hash)))
    }
}

/// Storage client that logs in (or not) and replays fixed chunk sizes.
#[derive(Default)]
pub struct MockClient {
    login_error: Option<String>,
    transfer_error: Option<String>,
    chunks: Vec<usize>,
    logins: Arc<Mutex<Vec<(String, String)>>>,
    transfers: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunks(mut self, chunks: Vec<usize>) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn failing_login(mut self, message: &str) -> Self {
        self.login_error = Some(message.to_string());
        self
    }

    pub fn failing_transfer(mut self, message: &str) -> Self {
        self.transfer_error = Some(message.to_string());
        self
    }

    pub fn logins(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        self.logins.clone()
    }

    /// Destinations of every transfer attempt.
    pub fn transfers(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        self.transfers.clone()
    }
}

#[async_trait]
impl StorageClient for MockClient {
    async fn login(&self, user: &str, password: &str) -> Result<(), BrowserError> {
        self.logins
            .lock()
            .unwrap()
            .push((user.to_string(), password.to_string()));
        match &self.login_error {
            Some(message) => Err(BrowserError::Login(message.clone())),
            None => Ok(()),
        }
    }

    async fn transfer(
        &self,
        _node: &Entry,
        destination: &Path,
        progress: Option<mpsc::Sender<usize>>,
    ) -> Result<(), BrowserError> {
        self.transfers.lock().unwrap().push(destination.to_path_buf());
        if let Some(tx) = progress {
            for chunk in &self.chunks {
                let _ = tx.send(*chunk).await;
            }
        }
        match &self.transfer_error {
            Some(message) => Err(BrowserError::Transfer(message.clone())),
            None => Ok(()),
        }
    }
}

const MOCK_ROOT_HASH: &str = "remote-root";

/// Remote tree built from listings keyed by parent hash.
pub struct MockRemote {
    listings: HashMap<String, Vec<Entry>>,
    fail_root_listing: bool,
    listed: Arc<Mutex<Vec<String>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            listings: HashMap::new(),
            fail_root_listing: false,
            listed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_root_children(self, entries: Vec<Entry>) -> Self {
        self.with_children(MOCK_ROOT_HASH, entries)
    }

    pub fn with_children(mut self, hash: &str, entries: Vec<Entry>) -> Self {
        self.listings.insert(hash.to_string(), entries);
        self
    }

    pub fn failing_root_listing(mut self) -> Self {
        self.fail_root_listing = true;
        self
    }

    /// Hashes of every listed node, in call order.
    pub fn listed(&self) -> Arc<Mutex<Vec<String>>> {
        self.listed.clone()
    }
}

#[async_trait]
impl RemoteFileSystem for MockRemote {
    async fn root(&self) -> Result<Entry, BrowserError> {
        Ok(Entry::directory("", MOCK_ROOT_HASH))
    }

    async fn list_children(&self, node: &Entry) -> Result<Vec<Entry>, BrowserError> {
        self.listed.lock().unwrap().push(node.hash.clone());
        if self.fail_root_listing && node.hash == MOCK_ROOT_HASH {
            return Err(BrowserError::Remote("mock get children error".to_string()));
        }
        Ok(self.listings.get(&node.hash).cloned().unwrap_or_default())
    }

    async fn hash_lookup(&self, hash: &str) -> Result<Entry, BrowserError> {
        if hash == MOCK_ROOT_HASH {
            return self.root().await;
        }
        self.listings
            .values()
            .flatten()
            .find(|e| e.hash == hash)
            .cloned()
            .ok_or_else(|| BrowserError::Remote(format!("node not found: {}", hash)))
    }
}

/// Side effects recorded by `MockLocalFs`.
#[derive(Debug, Default)]
pub struct LocalFsState {
    pub existing: HashSet<PathBuf>,
    pub exists_checks: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub created: Vec<(PathBuf, u32)>,
}

/// In-memory local filesystem with injectable failures.
pub struct MockLocalFs {
    cwd: PathBuf,
    remove_error: Option<String>,
    mkdir_error: Option<String>,
    cwd_error: Option<String>,
    state: Arc<Mutex<LocalFsState>>,
}

impl MockLocalFs {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            remove_error: None,
            mkdir_error: None,
            cwd_error: None,
            state: Arc::new(Mutex::new(LocalFsState::default())),
        }
    }

    pub fn with_existing(self, path: &str) -> Self {
        self.state.lock().unwrap().existing.insert(PathBuf::from(path));
        self
    }

    pub fn failing_remove(mut self, message: &str) -> Self {
        self.remove_error = Some(message.to_string());
        self
    }

    pub fn failing_mkdir(mut self, message: &str) -> Self {
        self.mkdir_error = Some(message.to_string());
        self
    }

    pub fn failing_current_dir(mut self, message: &str) -> Self {
        self.cwd_error = Some(message.to_string());
        self
    }

    pub fn state(&self) -> Arc<Mutex<LocalFsState>> {
        self.state.clone()
    }
}

#[async_trait]
impl LocalFileSystem for MockLocalFs {
    async fn exists(&self, path: &Path) -> Result<bool, BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.exists_checks.push(path.to_path_buf());
        Ok(state.existing.contains(path))
    }

    async fn remove_file(&self, path: &Path) -> Result<(), BrowserError> {
        if let Some(message) = &self.remove_error {
            return Err(io_error(message));
        }
        let mut state = self.state.lock().unwrap();
        state.existing.remove(path);
        state.removed.push(path.to_path_buf());
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), BrowserError> {
        if let Some(message) = &self.mkdir_error {
            return Err(io_error(message));
        }
        let mut state = self.state.lock().unwrap();
        state.existing.insert(path.to_path_buf());
        state.created.push((path.to_path_buf(), mode));
        Ok(())
    }

    fn current_dir(&self) -> Result<PathBuf, BrowserError> {
        match &self.cwd_error {
            Some(message) => Err(io_error(message)),
            None => Ok(self.cwd.clone()),
        }
    }
}

/// Progress output that can be read back after a download.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> ProgressOutput {
        Arc::new(Mutex::new(self.clone()))
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
