use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;

use crate::config::Config;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCredentials;
use crate::domain::auth::models::LoginResult;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::cache::Cache;
use crate::domain::mail::MailQueue;
use crate::domain::password_reset::ports::PasswordResetRepository;
use crate::domain::password_reset::service::PasswordResetService;
use crate::domain::session::models::AuthenticatedUser;
use crate::domain::session::service::TokenService;
use crate::domain::throttle::service::ThrottleService;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for authentication.
///
/// Composes token issuance, login throttling and password resets over the
/// injected credential store.
pub struct AuthService<UR, PR, C, MQ>
where
    UR: UserRepository,
    PR: PasswordResetRepository,
    C: Cache,
    MQ: MailQueue,
{
    users: Arc<UR>,
    tokens: TokenService<C>,
    throttle: ThrottleService<C>,
    resets: PasswordResetService<UR, PR, MQ>,
    password_hasher: PasswordHasher,
}

impl<UR, PR, C, MQ> AuthService<UR, PR, C, MQ>
where
    UR: UserRepository,
    PR: PasswordResetRepository,
    C: Cache,
    MQ: MailQueue,
{
    /// Create an auth service from its component services.
    pub fn new(
        users: Arc<UR>,
        tokens: TokenService<C>,
        throttle: ThrottleService<C>,
        resets: PasswordResetService<UR, PR, MQ>,
    ) -> Self {
        Self {
            users,
            tokens,
            throttle,
            resets,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Wire every component service from configuration.
    ///
    /// # Arguments
    /// * `config` - Loaded application configuration
    /// * `users` - Credential store
    /// * `resets` - Password reset store
    /// * `cache` - Shared cache for revocation markers and throttle counters
    /// * `mail` - Queue for outbound reset mail
    pub fn from_config(
        config: &Config,
        users: Arc<UR>,
        resets: Arc<PR>,
        cache: Arc<C>,
        mail: Arc<MQ>,
    ) -> Self {
        Self::new(
            Arc::clone(&users),
            TokenService::new(&config.jwt, Arc::clone(&cache)),
            ThrottleService::new(&config.throttle, cache),
            PasswordResetService::new(&config.password_reset, users, resets, mail),
        )
    }

    async fn record_failed_attempt(&self, email: &EmailAddress, origin: &str) -> AuthError {
        match self.throttle.incr(email.as_str(), origin).await {
            Ok(_) => AuthError::LoginFailed,
            Err(e) => {
                tracing::error!(
                    origin = %origin,
                    error = %e,
                    "Failed to record failed login attempt"
                );
                AuthError::from(e)
            }
        }
    }
}

#[async_trait]
impl<UR, PR, C, MQ> AuthServicePort for AuthService<UR, PR, C, MQ>
where
    UR: UserRepository,
    PR: PasswordResetRepository,
    C: Cache,
    MQ: MailQueue,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        if self.users.exists_by_email(&command.email, None).await? {
            return Err(AuthError::EmailAlreadyExists(command.email.to_string()));
        }

        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash: self.password_hasher.hash(&command.password)?,
            role_id: command.role_id,
        };

        let created_user = self.users.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(
        &self,
        credentials: LoginCredentials,
        origin: &str,
    ) -> Result<LoginResult, AuthError> {
        let email = &credentials.email;

        if self.throttle.blocked(email.as_str(), origin).await? {
            tracing::warn!(origin = %origin, "Login rejected by throttle");
            return Err(AuthError::ThrottleLogin);
        }

        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                self.password_hasher.equalize_timing(&credentials.password);
                return Err(self.record_failed_attempt(email, origin).await);
            }
        };

        if !self
            .password_hasher
            .verify(&credentials.password, &user.password_hash)?
        {
            tracing::debug!(user_id = %user.id, origin = %origin, "Password mismatch");
            return Err(self.record_failed_attempt(email, origin).await);
        }

        let issued = self.tokens.issue(&user).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Failed to issue session token");
            AuthError::from(e)
        })?;

        self.throttle.clear(email.as_str(), origin).await?;

        tracing::info!(user_id = %user.id, origin = %origin, "User logged in");

        Ok(LoginResult {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        Ok(self.tokens.invalidate(token).await?)
    }

    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        Ok(self.tokens.decode(token).await?)
    }

    async fn change_password(
        &self,
        user_id: &UserId,
        confirmation: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;

        if !self
            .password_hasher
            .verify(confirmation, &user.password_hash)?
        {
            return Err(AuthError::InvalidateConfirmPass);
        }

        user.password_hash = self.password_hasher.hash(new_password)?;
        self.users.update(user).await?;

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }

    async fn forgot_password(&self, email: &EmailAddress) -> Result<(), AuthError> {
        self.resets.forgot_password(email).await
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        self.resets.reset_password(token, new_password).await
    }
}
