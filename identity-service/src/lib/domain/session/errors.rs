use thiserror::Error;

use crate::domain::cache::CacheError;

/// Error for session token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Token is malformed, expired, or not signed with our key.
    #[error("JWT token missing or invalid")]
    InvalidCredentials,

    /// Token verified but does not carry the session claims.
    #[error("Invalid session claims: {0}")]
    InvalidClaims(String),

    #[error("JWT token is revoked")]
    Revoked,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Revocation cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl From<CacheError> for SessionError {
    fn from(err: CacheError) -> Self {
        SessionError::CacheUnavailable(err.to_string())
    }
}
