use auth::PasswordError;
use thiserror::Error;

use crate::domain::cache::CacheError;
use crate::domain::session::errors::SessionError;
use crate::user::errors::StoreError;

/// Top-level error for authentication operations.
///
/// Messages are safe to show to end users. Unknown identifiers and wrong
/// passwords deliberately share `LoginFailed`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    // Session token errors
    #[error("JWT token missing or invalid.")]
    InvalidCredentials,

    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("JWT token is revoked.")]
    Revoked,

    // Credential errors
    #[error("These credentials do not match our records.")]
    LoginFailed,

    #[error("Too many login attempts. Please try again later.")]
    ThrottleLogin,

    #[error("Invalid email.")]
    InvalidateEmail,

    #[error("Invalid confirm password.")]
    InvalidateConfirmPass,

    #[error("Invalid token forgot password.")]
    InvalidateToken,

    #[error("User already exists by email.")]
    EmailAlreadyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // Infrastructure errors
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Token signing failed: {0}")]
    SigningError(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

impl AuthError {
    /// Stable numeric code for delivery layers.
    pub fn code(&self) -> u32 {
        match self {
            AuthError::InvalidCredentials => 11000,
            AuthError::InvalidClaims(_) => 11001,
            AuthError::Revoked => 11002,
            AuthError::CacheUnavailable(_) => 12000,
            AuthError::StoreUnavailable(_) => 13000,
            AuthError::LoginFailed => 15000,
            AuthError::InvalidateEmail => 15002,
            AuthError::InvalidateConfirmPass => 15003,
            AuthError::InvalidateToken => 15004,
            AuthError::ThrottleLogin => 15005,
            AuthError::EmailAlreadyExists(_) => 17000,
            AuthError::UserNotFound(_) => 17001,
            AuthError::Password(_) => 18000,
            AuthError::SigningError(_) => 18001,
        }
    }

    /// Whether the failure comes from a collaborator rather than the caller's input.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AuthError::CacheUnavailable(_)
                | AuthError::StoreUnavailable(_)
                | AuthError::SigningError(_)
                | AuthError::Password(_)
        )
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials => AuthError::InvalidCredentials,
            SessionError::InvalidClaims(msg) => AuthError::InvalidClaims(msg),
            SessionError::Revoked => AuthError::Revoked,
            SessionError::Signing(msg) => AuthError::SigningError(msg),
            SessionError::CacheUnavailable(msg) => AuthError::CacheUnavailable(msg),
        }
    }
}

impl From<CacheError> for AuthError {
    fn from(err: CacheError) -> Self {
        AuthError::CacheUnavailable(err.to_string())
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::StoreUnavailable(err.to_string())
    }
}
