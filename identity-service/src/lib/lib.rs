pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use domain::user;
