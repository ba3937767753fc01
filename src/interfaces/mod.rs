pub mod plan_api;
pub mod providers;
