use std::sync::Arc;
use std::time::Duration;

use auth::Claims;
use auth::JwtError;
use auth::JwtHandler;
use chrono::Utc;

use crate::config::JwtConfig;
use crate::domain::cache::Cache;
use crate::domain::cache::CacheError;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::session_claims;
use crate::domain::session::models::AuthenticatedUser;
use crate::domain::session::models::IssuedToken;
use crate::domain::user::models::User;

const REVOKED_MARKER: &[u8] = b"true";

/// Issues, revokes and verifies bearer session tokens.
///
/// Tokens are self-contained; the cache is only consulted as a revocation list.
pub struct TokenService<C>
where
    C: Cache,
{
    jwt_handler: JwtHandler,
    cache: Arc<C>,
    lifetime: chrono::Duration,
}

impl<C> TokenService<C>
where
    C: Cache,
{
    /// Create a token service signing with the configured secret.
    pub fn new(config: &JwtConfig, cache: Arc<C>) -> Self {
        Self {
            jwt_handler: JwtHandler::new(config.secret.as_bytes()),
            cache,
            lifetime: config.lifetime(),
        }
    }

    /// Sign a new session token for `user`.
    ///
    /// # Errors
    /// * `Signing` - Claims could not be signed
    pub fn issue(&self, user: &User) -> Result<IssuedToken, SessionError> {
        let claims = session_claims(user, self.lifetime);
        let expires_at = claims.exp.unwrap_or_default();

        let token = self
            .jwt_handler
            .encode(&claims)
            .map_err(|e| SessionError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Revoke `token` until it would have expired anyway.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token cannot be verified
    /// * `InvalidClaims` - Token lacks the session claims
    /// * `CacheUnavailable` - Revocation marker could not be written
    pub async fn invalidate(&self, token: &str) -> Result<(), SessionError> {
        let claims = self.verify(token)?;
        let identity = AuthenticatedUser::try_from(claims.clone())?;

        let remaining = claims
            .remaining_seconds(Utc::now().timestamp())
            .unwrap_or_default()
            .clamp(1, self.lifetime.num_seconds().max(1));
        let ttl = Duration::from_secs(remaining as u64);

        self.cache
            .set(&revocation_key(&identity.token_id), REVOKED_MARKER, ttl)
            .await?;

        tracing::info!(
            user_id = %identity.id,
            ttl_seconds = remaining,
            "Session token revoked"
        );

        Ok(())
    }

    /// Verify `token` and return the identity it carries.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token is malformed, expired, or wrongly signed
    /// * `InvalidClaims` - Token lacks the session claims
    /// * `Revoked` - Token was logged out
    /// * `CacheUnavailable` - Revocation list could not be read
    pub async fn decode(&self, token: &str) -> Result<AuthenticatedUser, SessionError> {
        let claims = self.verify(token)?;
        let identity = AuthenticatedUser::try_from(claims)?;

        match self.cache.get(&revocation_key(&identity.token_id)).await {
            Ok(_) => {
                tracing::debug!(user_id = %identity.id, "Rejected revoked session token");
                Err(SessionError::Revoked)
            }
            Err(CacheError::KeyNotFound) => Ok(identity),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read revocation list");
                Err(e.into())
            }
        }
    }

    fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        self.jwt_handler.decode::<Claims>(token).map_err(|e| match e {
            JwtError::InvalidClaims(msg) => {
                tracing::warn!(error = %msg, "Session token claims have the wrong shape");
                SessionError::InvalidClaims(msg)
            }
            JwtError::TokenExpired => {
                tracing::debug!("Session token expired");
                SessionError::InvalidCredentials
            }
            other => {
                tracing::warn!(error = %other, "Session token failed verification");
                SessionError::InvalidCredentials
            }
        })
    }
}

fn revocation_key(token_id: &str) -> String {
    format!("revoked:{}", token_id)
}
