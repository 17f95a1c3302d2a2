use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("Asset loading failed: {0}")]
    Load(String),

    #[error("Vocabulary is missing special token {0}")]
    MissingSpecialToken(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Classifier is not initialized")]
    NotInitialized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sentiment analysis operations
pub type Result<T> = std::result::Result<T, SentimentError>;
