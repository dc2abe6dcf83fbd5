use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::StoreError;

/// Credential store operations consumed by the authentication core.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by login identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Check whether a user holds this login identifier.
    ///
    /// # Arguments
    /// * `email` - Login identifier to look for
    /// * `exclude` - User to ignore, so an account does not conflict with itself
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn exists_by_email(
        &self,
        email: &EmailAddress,
        exclude: Option<UserId>,
    ) -> Result<bool, StoreError>;

    /// Persist a new user.
    ///
    /// # Errors
    /// * `Rejected` - Store refused the record (e.g. uniqueness violation)
    /// * `Unavailable` - Store could not be reached
    async fn create(&self, user: User) -> Result<User, StoreError>;

    /// Persist changes to an existing user.
    ///
    /// # Errors
    /// * `Rejected` - User no longer exists or the record was refused
    /// * `Unavailable` - Store could not be reached
    async fn update(&self, user: User) -> Result<User, StoreError>;
}
