use auth::Claims;

use crate::domain::session::errors::SessionError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

const NAME_CLAIM: &str = "name";
const EMAIL_CLAIM: &str = "email";
const ROLE_CLAIM: &str = "role_id";

/// A freshly signed session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Absolute expiry (Unix timestamp, seconds)
    pub expires_at: i64,
}

/// Identity reconstructed from a verified, non-revoked session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    pub role_id: RoleId,
    pub token_id: String,
    pub expires_at: i64,
}

/// Build the claims embedded in a session token for `user`.
pub(crate) fn session_claims(user: &User, lifetime: chrono::Duration) -> Claims {
    Claims::for_session(user.id, lifetime)
        .with_extra(NAME_CLAIM, &user.name)
        .with_extra(EMAIL_CLAIM, user.email.as_str())
        .with_extra(ROLE_CLAIM, user.role_id.0)
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = SessionError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let missing = |claim: &str| SessionError::InvalidClaims(format!("missing '{}'", claim));

        let subject = claims.sub.as_deref().ok_or_else(|| missing("sub"))?;
        let id = UserId::from_string(subject)
            .map_err(|e| SessionError::InvalidClaims(e.to_string()))?;

        let token_id = claims.jti.clone().ok_or_else(|| missing("jti"))?;
        let expires_at = claims.exp.ok_or_else(|| missing("exp"))?;

        let name = claims
            .extra_str(NAME_CLAIM)
            .ok_or_else(|| missing(NAME_CLAIM))?
            .to_string();

        let email = claims
            .extra_str(EMAIL_CLAIM)
            .ok_or_else(|| missing(EMAIL_CLAIM))?;
        let email = EmailAddress::new(email.to_string())
            .map_err(|e| SessionError::InvalidClaims(e.to_string()))?;

        let role_id = claims
            .extra_i64(ROLE_CLAIM)
            .and_then(|role| i32::try_from(role).ok())
            .ok_or_else(|| missing(ROLE_CLAIM))?;

        Ok(Self {
            id,
            name,
            email,
            role_id: RoleId(role_id),
            token_id,
            expires_at,
        })
    }
}
