use serde::{Deserialize, Serialize};
use url::Url;

/// GraphQL backend configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// GraphQL endpoint every operation is posted to (required).
    /// TOML: `backend.endpoint`. Example: `https://hasura.example.com/v1/graphql`.
    #[serde(default)]
    pub endpoint: Option<Url>,

    /// Value sent in the `x-hasura-admin-secret` header (required, non-empty).
    /// TOML: `backend.admin_secret`. Env: `METAGATE_BACKEND__ADMIN_SECRET`.
    #[serde(default)]
    pub admin_secret: String,

    /// Optional upstream HTTP proxy for the reqwest client.
    /// TOML: `backend.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Allow HTTP/2 multiplexing; disabled forces HTTP/1 with no idle pooling.
    /// TOML: `backend.enable_multiplexing`. Default: `false`.
    #[serde(default)]
    pub enable_multiplexing: bool,

    /// TOML: `backend.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout for a single GraphQL call.
    /// TOML: `backend.request_timeout_secs`. Default: `30`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            admin_secret: String::new(),
            proxy: None,
            enable_multiplexing: false,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}
