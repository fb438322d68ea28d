use std::io;

/// Errors raised by the store, migration and mutation layers.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored value under `{key}` is not a list of items")]
    Corrupt { key: String },
    #[error("Item {order} not found")]
    NotFound { order: u32 },
    #[error("Unknown item type `{0}` (expected video|user|custom)")]
    InvalidType(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
