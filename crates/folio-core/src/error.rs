//! Error types for folio-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    #[error("Template pack not found: {0}")]
    PackNotFound(String),

    #[error("Issue '{0}' has no articles")]
    EmptyIssue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl FolioError {
    /// Create an error from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
