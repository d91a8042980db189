mod api;
mod client;
mod query;

pub use api::HasuraApi;
pub use client::MetaClient;

/// Header carrying the static admin secret on every backend call.
pub const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

/// Upper bound on how much of an unexpected upstream body ends up in logs.
pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 300;
