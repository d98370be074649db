//! Error types for the finstat-core library.

use thiserror::Error;

/// Main error type for the finstat library.
#[derive(Error, Debug)]
pub enum FinstatError {
    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to statement extraction.
///
/// A strategy finding nothing is never an error; these cover unexpected
/// faults that the coordinator catches and downgrades to an empty result.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A strategy failed unexpectedly mid-scan.
    #[error("strategy {strategy} failed: {message}")]
    Strategy { strategy: String, message: String },
}

/// Result type for the finstat library.
pub type Result<T> = std::result::Result<T, FinstatError>;
