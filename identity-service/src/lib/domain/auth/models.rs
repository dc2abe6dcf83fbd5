use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::User;

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub name: String,
    pub email: EmailAddress,
    pub password: String,
    pub role_id: RoleId,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `email` - Validated login identifier
    /// * `password` - Plain text password (hashed by the service)
    /// * `role_id` - Role granted to the account
    pub fn new(name: String, email: EmailAddress, password: String, role_id: RoleId) -> Self {
        Self {
            name,
            email,
            password,
            role_id,
        }
    }
}

/// Credentials presented at login.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: EmailAddress, password: impl Into<String>) -> Self {
        Self {
            email,
            password: password.into(),
        }
    }
}

/// Outcome of a successful login.
///
/// `user` is the stored identity, never the caller-supplied one.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    /// Absolute expiry (Unix timestamp, seconds)
    pub expires_at: i64,
    pub user: User,
}
