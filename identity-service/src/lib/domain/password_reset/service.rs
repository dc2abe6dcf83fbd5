use std::sync::Arc;

use auth::PasswordHasher;
use chrono::Utc;

use crate::config::PasswordResetConfig;
use crate::domain::auth::errors::AuthError;
use crate::domain::mail::MailMessage;
use crate::domain::mail::MailQueue;
use crate::domain::password_reset::ports::PasswordResetRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::UserRepository;

const RESET_SUBJECT: &str = "Reset Password";

/// One-time password reset tokens: issue by mail, redeem once while fresh.
pub struct PasswordResetService<UR, PR, MQ>
where
    UR: UserRepository,
    PR: PasswordResetRepository,
    MQ: MailQueue,
{
    users: Arc<UR>,
    resets: Arc<PR>,
    mail: Arc<MQ>,
    password_hasher: PasswordHasher,
    token_length: usize,
    lifetime: chrono::Duration,
}

impl<UR, PR, MQ> PasswordResetService<UR, PR, MQ>
where
    UR: UserRepository,
    PR: PasswordResetRepository,
    MQ: MailQueue,
{
    pub fn new(
        config: &PasswordResetConfig,
        users: Arc<UR>,
        resets: Arc<PR>,
        mail: Arc<MQ>,
    ) -> Self {
        Self {
            users,
            resets,
            mail,
            password_hasher: PasswordHasher::new(),
            token_length: config.token_length,
            lifetime: config.lifetime(),
        }
    }

    /// Issue a reset token for `email` and queue it for delivery.
    ///
    /// A new request replaces any earlier token for the same identifier.
    /// Returns as soon as the token is stored; delivery is not awaited.
    ///
    /// # Errors
    /// * `InvalidateEmail` - No account uses this identifier
    /// * `StoreUnavailable` - Credential or reset store failed
    pub async fn forgot_password(&self, email: &EmailAddress) -> Result<(), AuthError> {
        if !self.users.exists_by_email(email, None).await? {
            tracing::debug!("Password reset requested for unknown identifier");
            return Err(AuthError::InvalidateEmail);
        }

        let token = auth::random_alphanumeric(self.token_length);
        self.resets.store_or_update(email, &token).await?;

        let body = format!(
            "Your token to reset password is {}, this token will be expired in {} minutes.",
            token,
            self.lifetime.num_minutes()
        );
        self.mail
            .submit(MailMessage::new(email.clone(), RESET_SUBJECT, body));

        tracing::info!("Password reset token issued");

        Ok(())
    }

    /// Redeem `token`, replacing the owner's password.
    ///
    /// The token is consumed before the credential is written, so of several
    /// concurrent redemptions only one changes the password. If the update
    /// then fails the token is already spent and a new one must be requested.
    ///
    /// # Errors
    /// * `InvalidateToken` - Token unknown, already used, or older than the freshness window
    /// * `Password` - New password could not be hashed
    /// * `StoreUnavailable` - Credential or reset store failed
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let not_before = Utc::now() - self.lifetime;

        let email = self
            .resets
            .find_email_by_token(token, not_before)
            .await?
            .ok_or(AuthError::InvalidateToken)?;

        let mut user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            tracing::warn!("Password reset token refers to a missing account");
            AuthError::InvalidateToken
        })?;

        user.password_hash = self.password_hasher.hash(new_password)?;

        if !self.resets.delete(&email, token).await? {
            tracing::warn!(user_id = %user.id, "Password reset token already redeemed");
            return Err(AuthError::InvalidateToken);
        }

        let user_id = user.id;
        self.users.update(user).await.map_err(|e| {
            tracing::error!(
                user_id = %user_id,
                error = %e,
                "Reset token consumed but password could not be updated"
            );
            AuthError::from(e)
        })?;

        tracing::info!(user_id = %user_id, "Password reset completed");

        Ok(())
    }
}
