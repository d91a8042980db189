mod backend;
mod config;
mod meta;

pub use backend::BackendError;
pub use config::ConfigError;
pub use meta::MetaError;
