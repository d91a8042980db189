pub mod backend;
pub mod config;
pub mod error;
pub mod server;
pub mod utils;

pub use backend::MetaClient;
pub use error::{BackendError, ConfigError, MetaError};
pub use server::router::{MetaState, meta_router};
