//! Error types for Shopcheck

use thiserror::Error;

use crate::verify::VerifyError;

/// Result type alias using Shopcheck Error
pub type Result<T> = std::result::Result<T, Error>;

/// Shopcheck error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Malformed price text: {text:?}")]
    MalformedPrice { text: String },

    #[error("Unknown sort mode: {0:?} (expected one of az, za, lohi, hilo)")]
    UnknownSortMode(String),

    #[error(transparent)]
    Verify(#[from] VerifyError),
}
