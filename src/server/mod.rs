pub mod guards;
pub mod router;
pub mod routes;

/// Version string echoed in every response envelope.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
