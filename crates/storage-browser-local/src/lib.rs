//! Local collaborators for storage-browser.
//!
//! - `TokioFileSystem`: the `LocalFileSystem` used for download destinations
//! - `MirrorStorage`: serves a local directory tree as a remote store
//! - `config`: command-line configuration for the `storage-browser` binary

pub mod config;
pub mod fs;
pub mod mirror;

pub use fs::TokioFileSystem;
pub use mirror::{node_hash, MirrorStorage, DEFAULT_CHUNK_SIZE};
