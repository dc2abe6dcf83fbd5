pub mod auth;
pub mod cache;
pub mod mail;
pub mod password_reset;
pub mod session;
pub mod throttle;
pub mod user;

#[cfg(test)]
pub(crate) mod mocks;
