use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storage_browser_core::{BrowserConfig, DEFAULT_PATH_SEPARATOR};

use crate::mirror::DEFAULT_CHUNK_SIZE;

/// Configuration for the storage-browser CLI.
#[derive(Parser, Debug, Clone)]
#[command(name = "storage-browser")]
#[command(about = "Resolve remote file paths to node hashes and download them with progress")]
pub struct Config {
    /// Directory served as the remote store
    #[arg(long, env = "STORAGE_MIRROR_ROOT")]
    pub mirror_root: PathBuf,

    /// Login user
    #[arg(long, default_value = "", env = "STORAGE_USER")]
    pub user: String,

    /// Login password
    #[arg(long, default_value = "", env = "STORAGE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Name of the top-level remote directory used as the root
    #[arg(long = "root-dir", env = "STORAGE_ROOT_DIR")]
    pub root_directory_name: String,

    /// Separator between path components
    #[arg(long, default_value_t = DEFAULT_PATH_SEPARATOR, env = "STORAGE_PATH_SEPARATOR")]
    pub separator: char,

    /// Bytes per transfer chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "STORAGE_CHUNK_SIZE")]
    pub chunk_size: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the node hash of a remote file
    Resolve {
        /// Path relative to the root directory
        path: String,

        /// Print the whole entry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download a remote file, printing <progress> lines to stdout
    Download {
        /// Path relative to the root directory
        remote_path: String,

        /// Destination, relative to the working directory
        local_path: PathBuf,
    },
}

impl Config {
    pub fn browser_config(&self) -> BrowserConfig {
        BrowserConfig::new(&self.user, &self.password, &self.root_directory_name)
            .with_separator(self.separator)
    }
}
