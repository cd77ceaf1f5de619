//! Error types for geotable operations.

use thiserror::Error;

/// Errors surfaced by query and write operations.
#[derive(Error, Debug)]
pub enum GeoTableError {
    /// Configuration error (bad attribute name, unusable hash key length).
    #[error("configuration error: {0}")]
    Config(String),

    /// An item's encoded-geometry attribute is missing or unparseable.
    #[error("malformed geometry attribute: {0}")]
    Geometry(String),

    /// Error propagated unchanged from the underlying store.
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GeoTableError {
    /// Wrap a store client error without altering it.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        GeoTableError::Store(Box::new(err))
    }

    /// Wrap a store error that is only available as a message.
    pub fn store_msg(msg: impl Into<String>) -> Self {
        GeoTableError::Store(msg.into().into())
    }
}

/// Result type alias for geotable operations.
pub type Result<T> = std::result::Result<T, GeoTableError>;
