//! Error types for the grass tracking core

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed grass key: expected {expected} tokens, got {got}")]
    MalformedKey { expected: usize, got: usize },

    #[error("unsupported save format version '{0}': a newer reader is required")]
    UnsupportedVersion(String),

    #[error("corrupt save data: {0}")]
    CorruptData(String),

    #[error("collision scratch stack read while empty")]
    EmptyScratch,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
