//! Core types and operations for browsing remote hierarchical storage.
//!
//! This crate resolves slash-delimited paths to node hashes and downloads
//! the resolved nodes with progress reporting:
//! - `Entry` / `EntryKind`: descriptors returned by remote listings
//! - `index`: lookups over a single listing (`find_file`, `find_directory`)
//! - `PathResolver`: component-by-component traversal from a root hash
//! - `RepositoryBrowser`: login, root discovery and path queries
//! - `ProgressDownloader`: local cleanup plus transfer with `<progress>` lines
//!
//! Collaborators (`StorageClient`, `RemoteFileSystem`, `LocalFileSystem`) are
//! traits implemented by backend crates.

mod browser;
mod download;
mod entry;
mod error;
pub mod index;
mod local;
mod remote;
mod resolve;

#[cfg(test)]
mod testing;

pub use browser::{BrowserConfig, RepositoryBrowser, DEFAULT_PATH_SEPARATOR};
pub use download::{
    format_progress, percent_complete, ProgressDownloader, ProgressOutput,
    PROGRESS_CHANNEL_CAPACITY,
};
pub use entry::{Entry, EntryKind};
pub use error::BrowserError;
pub use local::{LocalFileSystem, DIRECTORY_MODE};
pub use remote::{ChildLister, RemoteFileSystem, StorageClient};
pub use resolve::PathResolver;
