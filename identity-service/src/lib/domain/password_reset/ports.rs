use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::user::errors::StoreError;

/// Persistence of password reset records, one per login identifier.
#[async_trait]
pub trait PasswordResetRepository: Send + Sync + 'static {
    /// Insert the record for `email`, or replace its token and reset its creation time.
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn store_or_update(&self, email: &EmailAddress, token: &str) -> Result<(), StoreError>;

    /// Find the identifier owning `token` among records created at or after `not_before`.
    ///
    /// # Returns
    /// Owning email, or None if no fresh record holds this token
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn find_email_by_token(
        &self,
        token: &str,
        not_before: DateTime<Utc>,
    ) -> Result<Option<EmailAddress>, StoreError>;

    /// Remove the record for `email` if it still holds `token`.
    ///
    /// Must be atomic: of several concurrent calls for the same record, at
    /// most one returns true.
    ///
    /// # Returns
    /// Whether this call removed the record
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn delete(&self, email: &EmailAddress, token: &str) -> Result<bool, StoreError>;
}
