use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid source: {0}")]
    InvalidSource(String),
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
    #[error(transparent)]
    Core(#[from] starload_core::Error),
}
