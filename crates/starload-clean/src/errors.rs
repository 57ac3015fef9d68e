use thiserror::Error;

/// Errors emitted while exporting cleaned batches and reports.
///
/// Cleaning itself never fails; bad values degrade to null.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("encoding error: {0}")]
    Encoding(String),
}
