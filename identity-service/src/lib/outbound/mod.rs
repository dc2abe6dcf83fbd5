pub mod cache;
pub mod mail;
