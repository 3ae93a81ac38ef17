// error.rs

use thiserror::Error;

/// Failures of the key-value substrate behind the history store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("stored value is not a list of strings: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no page at {0}")]
    NotFound(String),
    #[error("page {0} has no <main> region")]
    MissingMain(String),
    #[error("failed to read content: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad post manifest: {0}")]
    Manifest(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("no previous entry in navigation history")]
    NoPrevious,
    #[error("no next entry in navigation history")]
    NoNext,
    #[error("navigation was dropped before completing")]
    Dropped,
    #[error(transparent)]
    Content(#[from] ContentError),
}
