pub mod config;
pub mod error;
pub mod organization;
pub mod quota;
pub mod validate;
