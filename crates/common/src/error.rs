use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdeaDropError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Backend request failed: {0}")]
    Backend(String),

    #[error("Storage upload failed: {0}")]
    StorageUpload(String),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

pub type IdeaDropResult<T> = Result<T, IdeaDropError>;
