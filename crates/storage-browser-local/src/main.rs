use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use storage_browser_core::{ProgressDownloader, RemoteFileSystem, RepositoryBrowser};
use storage_browser_local::config::{Command, Config};
use storage_browser_local::{MirrorStorage, TokioFileSystem};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the <progress> lines
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    info!("Starting storage-browser v{}", env!("CARGO_PKG_VERSION"));
    info!("  Mirror root: {}", config.mirror_root.display());
    info!("  Root directory: {}", config.root_directory_name);

    let storage = Arc::new(
        MirrorStorage::new(&config.mirror_root).with_chunk_size(config.chunk_size),
    );
    let downloader = ProgressDownloader::new(storage.clone(), Arc::new(TokioFileSystem::new()));
    let browser = RepositoryBrowser::new(
        config.browser_config(),
        storage.clone(),
        storage.clone(),
        downloader,
    );

    browser
        .initialize()
        .await
        .context("failed to initialize storage browser")?;

    match &config.command {
        Command::Resolve { path, json } => {
            let hash = browser.get_object_node(path).await?;
            if *json {
                let node = storage.hash_lookup(&hash).await?;
                println!("{}", serde_json::to_string_pretty(&node)?);
            } else {
                println!("{}", hash);
            }
        }
        Command::Download {
            remote_path,
            local_path,
        } => {
            let node = browser
                .fetch(remote_path, local_path)
                .await
                .with_context(|| format!("failed to download {}", remote_path))?;
            info!("Downloaded {} ({} bytes)", node.name, node.size());
        }
    }

    Ok(())
}
