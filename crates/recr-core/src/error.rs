//! Error types for the recr-core library.
//!
//! Extraction itself has no failure mode: any transcript, however garbled,
//! produces a defined result with fallback values. Errors only arise at the
//! edges, when loading or persisting configuration.

use thiserror::Error;

/// Main error type for the recr library.
#[derive(Error, Debug)]
pub enum RecrError {
    /// Configuration could not be parsed or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the recr library.
pub type Result<T> = std::result::Result<T, RecrError>;
