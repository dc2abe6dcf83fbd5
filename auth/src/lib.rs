//! Authentication utilities library
//!
//! Provides reusable authentication primitives for services:
//! - Password hashing (Argon2id)
//! - JWT token generation and validation
//! - Random single-use token generation
//!
//! Services define their own claim shapes and error taxonomies on top of these.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{JwtHandler, Claims};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::for_session("user123", Duration::hours(1)).with_extra("name", "alice");
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.extra_str("name"), Some("alice"));
//! ```
//!
//! ## Reset Tokens
//! ```
//! let token = auth::random_alphanumeric(10);
//! assert_eq!(token.len(), 10);
//! ```

pub mod jwt;
pub mod password;
pub mod random;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use random::random_alphanumeric;
