//! Error types for address allocation

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure talking to the cooldown cache
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Address engine errors
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The caller passed something it should never pass (missing network, missing used list)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid prefix length: /{0}")]
    InvalidPrefix(u8),

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
