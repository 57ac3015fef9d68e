use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("schema mismatch loading '{table}': {message}")]
    SchemaMismatch { table: String, message: String },
    #[error("table '{0}' already exists")]
    TableExists(String),
    #[error(transparent)]
    Core(#[from] starload_core::Error),
}
