use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCredentials;
use crate::domain::auth::models::LoginResult;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::session::models::AuthenticatedUser;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for authentication operations exposed to delivery layers.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create a new account with a hashed password.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Identifier is already registered
    /// * `Password` - Password hashing failed
    /// * `StoreUnavailable` - Credential store failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Verify credentials from `origin` and issue a session token.
    ///
    /// # Arguments
    /// * `credentials` - Login identifier and plaintext password
    /// * `origin` - Client address used to scope throttling
    ///
    /// # Errors
    /// * `ThrottleLogin` - Too many failed attempts for this identifier and origin
    /// * `LoginFailed` - Unknown identifier or wrong password
    /// * `SigningError` - Token could not be signed
    /// * `CacheUnavailable` - Throttle state could not be read or written
    /// * `StoreUnavailable` - Credential store failed
    async fn login(
        &self,
        credentials: LoginCredentials,
        origin: &str,
    ) -> Result<LoginResult, AuthError>;

    /// Revoke a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token cannot be verified
    /// * `InvalidClaims` - Token lacks the session claims
    /// * `CacheUnavailable` - Revocation could not be recorded
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Resolve a presented session token to its identity.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token malformed, expired, or wrongly signed
    /// * `InvalidClaims` - Token lacks the session claims
    /// * `Revoked` - Token was logged out
    /// * `CacheUnavailable` - Revocation list could not be read
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;

    /// Replace a user's password after confirming the current one.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `InvalidateConfirmPass` - Confirmation does not match the stored password
    /// * `Password` - Password hashing failed
    /// * `StoreUnavailable` - Credential store failed
    async fn change_password(
        &self,
        user_id: &UserId,
        confirmation: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Mail a one-time password reset token.
    ///
    /// # Errors
    /// * `InvalidateEmail` - No account uses this identifier
    /// * `StoreUnavailable` - Credential or reset store failed
    async fn forgot_password(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Redeem a password reset token.
    ///
    /// # Errors
    /// * `InvalidateToken` - Token unknown, used, or expired
    /// * `Password` - Password hashing failed
    /// * `StoreUnavailable` - Credential or reset store failed
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError>;
}
