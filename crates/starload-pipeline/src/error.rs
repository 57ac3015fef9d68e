use starload_core::Entity;
use starload_extract::ExtractError;
use starload_load::LoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extract error: {0}")]
    Extract(#[from] ExtractError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error(transparent)]
    Core(#[from] starload_core::Error),
    #[error("source for {0} is missing upstream")]
    MissingSource(Entity),
}
