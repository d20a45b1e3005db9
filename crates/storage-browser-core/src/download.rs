use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::entry::Entry;
use crate::error::BrowserError;
use crate::local::{LocalFileSystem, DIRECTORY_MODE};
use crate::remote::StorageClient;

/// Capacity of the chunk-size channel between a transfer and its observer.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 64;

/// Sink for `<progress>` lines. Defaults to standard output.
pub type ProgressOutput = Arc<Mutex<dyn Write + Send>>;

/// Percentage of `total` covered by `received`, rounded half away from zero.
///
/// Not clamped: a transfer that delivers more than the declared size reports
/// more than 100. A declared size of zero always reports 100.
pub fn percent_complete(received: u64, total: i64) -> i64 {
    if total <= 0 {
        return 100;
    }
    (100.0 * received as f64 / total as f64).round() as i64
}

/// One progress line, without the trailing newline.
pub fn format_progress(percent: i64) -> String {
    format!("<progress>{}</progress>", percent)
}

/// Downloads remote nodes to local paths, reporting progress as it goes.
pub struct ProgressDownloader {
    client: Arc<dyn StorageClient>,
    fs: Arc<dyn LocalFileSystem>,
    output: ProgressOutput,
}

impl ProgressDownloader {
    pub fn new(client: Arc<dyn StorageClient>, fs: Arc<dyn LocalFileSystem>) -> Self {
        Self {
            client,
            fs,
            output: Arc::new(Mutex::new(std::io::stdout())),
        }
    }

    /// Write progress lines to `output` instead of standard output.
    pub fn with_output(mut self, output: ProgressOutput) -> Self {
        self.output = output;
        self
    }

    /// Download `node` to `local_path` (relative to the working directory).
    ///
    /// Steps run in order and the first failure is returned as is:
    /// remove a stale local copy, create the parent directory, resolve the
    /// absolute destination, transfer while reporting progress. A directory
    /// created before a failed transfer is left in place.
    #[instrument(skip(self, node), fields(node = %node.hash), level = "debug")]
    pub async fn download_file(&self, node: &Entry, local_path: &Path) -> Result<(), BrowserError> {
        self.remove_outdated_file(local_path).await?;
        self.create_parent_dir(local_path).await?;

        let destination = self.fs.current_dir()?.join(local_path);
        self.transfer_with_progress(node, &destination).await?;

        info!(
            "Downloaded {} ({} bytes) to {}",
            node.name,
            node.size(),
            destination.display()
        );
        Ok(())
    }

    async fn remove_outdated_file(&self, local_path: &Path) -> Result<(), BrowserError> {
        if self.fs.exists(local_path).await? {
            self.fs.remove_file(local_path).await?;
            debug!("Removed outdated file {}", local_path.display());
        }
        Ok(())
    }

    async fn create_parent_dir(&self, local_path: &Path) -> Result<(), BrowserError> {
        let Some(dir) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };
        if self.fs.exists(dir).await? {
            return Ok(());
        }
        self.fs.create_dir_all(dir, DIRECTORY_MODE).await?;
        debug!("Created directory {}", dir.display());
        Ok(())
    }

    /// Run the transfer with a progress observer attached.
    ///
    /// The observer owns the receiver before the transfer starts, and it is
    /// always awaited after the transfer returns, even on failure.
    async fn transfer_with_progress(
        &self,
        node: &Entry,
        destination: &Path,
    ) -> Result<(), BrowserError> {
        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let observer = tokio::spawn(report_progress(rx, node.size(), self.output.clone()));

        let result = self.client.transfer(node, destination, Some(tx)).await;

        match observer.await {
            Ok(received) => debug!("Progress observer saw {} bytes", received),
            Err(e) => warn!("Progress observer failed: {}", e),
        }
        result
    }
}

/// Drain chunk sizes until the sender side closes, printing one line per chunk.
async fn report_progress(mut rx: mpsc::Receiver<usize>, total: i64, output: ProgressOutput) -> u64 {
    let mut received: u64 = 0;
    while let Some(chunk) = rx.recv().await {
        received += chunk as u64;
        write_progress(&output, percent_complete(received, total));
    }
    received
}

fn write_progress(output: &ProgressOutput, percent: i64) {
    let mut out = output.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Err(e) = writeln!(out, "{}", format_progress(percent)).and_then(|()| out.flush()) {
        warn!("Failed to write progress: {}", e);
    }
}
