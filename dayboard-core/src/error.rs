//! Error types for the dayboard engine.

use thiserror::Error;

use crate::item::{ItemId, Source};

/// Errors that can occur in dayboard operations.
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No item with id {0}")]
    NotFound(ItemId),

    #[error("Item {id} belongs to the {src} source")]
    WrongSource { id: ItemId, src: Source },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for dayboard operations.
pub type BoardResult<T> = Result<T, BoardError>;
