//! Error types for terminal-notifier

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Closed failure taxonomy shared by every error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io,
    SubprocessFailure,
    Timeout,
    UnknownKind,
}

/// Title lookup/persistence errors (graceful degradation)
#[derive(Debug, Error)]
pub enum TitleError {
    #[error("title file {} → ∅", .path.display())]
    NotFound { path: PathBuf },

    #[error("title file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("set terminal title: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },
}

impl TitleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TitleError::NotFound { .. } => ErrorKind::NotFound,
            TitleError::Io { .. } | TitleError::Terminal { .. } => ErrorKind::Io,
        }
    }
}

/// Toast delivery errors (never fatal, coerced to `false` at the boundary)
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("toast failed: {message}")]
    SubprocessFailure { message: String },

    #[error("toast timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("toast spawn failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("unknown toast kind {tag:?}")]
    UnknownKind { tag: String },
}

impl NotifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotifyError::SubprocessFailure { .. } => ErrorKind::SubprocessFailure,
            NotifyError::Timeout { .. } => ErrorKind::Timeout,
            NotifyError::Io { .. } => ErrorKind::Io,
            NotifyError::UnknownKind { .. } => ErrorKind::UnknownKind,
        }
    }
}
