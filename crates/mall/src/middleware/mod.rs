pub mod auth;
pub mod metrics;
pub mod session;
pub mod validate;
