pub mod config;
pub mod error;
pub mod interfaces;
pub mod logging;
pub mod plan_flow;
pub mod prompt;
pub mod providers;
pub mod server;
pub mod validation;

pub type Result<T> = std::result::Result<T, error::JustBeginError>;
