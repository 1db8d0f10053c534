use thiserror::Error;

/// Failures are fatal for the whole batch; nothing here is retried.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed bundle: {0}")]
    Bundle(String),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("parse error: {0}")]
    Parse(String),
}
