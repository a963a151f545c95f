pub mod default;
pub mod env;
pub mod imds;
pub mod static_provider;
