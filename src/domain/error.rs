use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("truelayer: {0}")]
    Upstream(String),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
