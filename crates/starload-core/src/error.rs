use thiserror::Error;

/// Core error type shared across starload crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A batch was built with rows that do not line up with its columns.
    #[error("invalid batch: {0}")]
    InvalidBatch(String),
    /// The warehouse model violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A requested feature is not supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by starload crates.
pub type Result<T> = std::result::Result<T, Error>;
