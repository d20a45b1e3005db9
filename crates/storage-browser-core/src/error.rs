use crate::entry::EntryKind;

/// Errors produced by the browser, the downloader and their collaborators.
///
/// Collaborators return these directly, so the core passes them through
/// without adding context.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("could not find {kind}: {name}")]
    NotFound { kind: EntryKind, name: String },

    #[error("trying to find object node for an empty path")]
    EmptyPath,

    #[error("failed to get root node hash")]
    RootNodeNotFound,

    #[error("browser is not initialized")]
    NotInitialized,

    #[error("login failed: {0}")]
    Login(String),

    #[error("remote error: {0}")]
    Remote(String),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
