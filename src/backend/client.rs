use crate::config::BackendConfig;
use crate::error::{BackendError, ConfigError};
use crate::utils::logging::{body_preview, with_pretty_json_debug};
use metagate_schema::{GraphqlResponse, Meta, MetaDraft, Table};
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use serde::{Deserialize, de::DeserializeOwned};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, info};
use url::Url;

use super::{HasuraApi, UPSTREAM_BODY_PREVIEW_CHARS, query};

const USER_AGENT: &str = concat!("metagate/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct NameRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Returning {
    returning: Vec<NameRow>,
}

/// Client for the meta tables on the GraphQL backend.
///
/// Cheap to clone; the underlying reqwest client is shared.
#[derive(Clone)]
pub struct MetaClient {
    http: reqwest::Client,
    endpoint: Url,
    admin_secret: Arc<str>,
}

impl MetaClient {
    pub fn new(http: reqwest::Client, endpoint: Url, admin_secret: Arc<str>) -> Self {
        Self {
            http,
            endpoint,
            admin_secret,
        }
    }

    pub fn from_config(cfg: &BackendConfig) -> Result<Self, ConfigError> {
        let endpoint = cfg
            .endpoint
            .clone()
            .ok_or(ConfigError::Missing("backend.endpoint"))?;
        let http = build_http_client(cfg)?;
        Ok(Self::new(http, endpoint, Arc::from(cfg.admin_secret.as_str())))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Lists every record of `table`, ordered by name ascending.
    pub async fn query_items(&self, table: Table) -> Result<Vec<Meta>, BackendError> {
        const OPERATION: &str = "query_meta_items";
        let query = query::query_items(table);
        let envelope = self.execute(OPERATION, table, &query).await?;
        take_data(envelope, OPERATION, table, &table.relation())
    }

    /// Lists records whose name matches `pattern` case-insensitively anywhere in the name.
    pub async fn search_items(
        &self,
        table: Table,
        pattern: &str,
    ) -> Result<Vec<Meta>, BackendError> {
        const OPERATION: &str = "search_meta_items";
        let query = query::search_items(table, pattern);
        let envelope = self.execute(OPERATION, table, &query).await?;
        take_data(envelope, OPERATION, table, &table.relation())
    }

    /// Inserts `draft` unless a record with the same name exists; returns the stored name.
    pub async fn insert_item(
        &self,
        table: Table,
        draft: &MetaDraft,
    ) -> Result<String, BackendError> {
        const OPERATION: &str = "insert_meta_item";

        let existing = self
            .search_items(table, &query::regex_escape(&draft.name))
            .await?;
        if existing.iter().any(|item| {
            item.name
                .as_deref()
                .is_some_and(|name| name.to_lowercase() == draft.name.to_lowercase())
        }) {
            return Err(BackendError::AlreadyExists {
                operation: OPERATION,
                table,
                name: draft.name.clone(),
            });
        }

        let query = query::insert_item(table, draft);
        let envelope = self.execute(OPERATION, table, &query).await?;
        let row: NameRow = take_data(envelope, OPERATION, table, &query::insert_field(table))?;
        Ok(row.name)
    }

    /// Overwrites the record with `id`; returns the updated name.
    pub async fn update_item(
        &self,
        table: Table,
        id: &str,
        draft: &MetaDraft,
    ) -> Result<String, BackendError> {
        const OPERATION: &str = "update_meta_item";
        let query = query::update_item(table, id, draft);
        let envelope = self.execute(OPERATION, table, &query).await?;
        let result: Returning = take_data(envelope, OPERATION, table, &query::update_field(table))?;
        result
            .returning
            .into_iter()
            .next()
            .map(|row| row.name)
            .ok_or_else(|| BackendError::NotFound {
                operation: OPERATION,
                table,
                id: id.to_string(),
            })
    }

    async fn execute(
        &self,
        operation: &'static str,
        table: Table,
        query: &str,
    ) -> Result<GraphqlResponse, BackendError> {
        let start = Instant::now();
        let req =
            HasuraApi::build_request(&self.http, &self.endpoint, &self.admin_secret, query)?;
        let resp = self.http.execute(req).await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        info!(
            operation,
            table = %table,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "[Hasura] {} -> {}",
            operation,
            table
        );

        let mut envelope: GraphqlResponse = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(e) => {
                debug!(
                    operation,
                    %status,
                    error = %e,
                    body = %body_preview(&bytes, UPSTREAM_BODY_PREVIEW_CHARS),
                    "[Hasura] Unstructured upstream error"
                );
                return Err(BackendError::UpstreamStatus {
                    operation,
                    table,
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
        };

        with_pretty_json_debug(&envelope, |pretty| {
            debug!(operation, table = %table, body = %pretty, "[Hasura] Response envelope");
        });

        if let Some(errors) = envelope.take_errors() {
            return Err(BackendError::Graphql {
                operation,
                table,
                errors,
                query: query.to_string(),
            });
        }

        if !status.is_success() {
            return Err(BackendError::UpstreamStatus {
                operation,
                table,
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(envelope)
    }
}

fn take_data<T: DeserializeOwned>(
    mut envelope: GraphqlResponse,
    operation: &'static str,
    table: Table,
    field: &str,
) -> Result<T, BackendError> {
    let value = envelope
        .take_field(field)
        .ok_or_else(|| BackendError::MissingData {
            operation,
            table,
            field: field.to_string(),
        })?;
    Ok(serde_json::from_value(value)?)
}

fn build_http_client(cfg: &BackendConfig) -> Result<reqwest::Client, ConfigError> {
    let mut headers = HeaderMap::new();

    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .timeout(Duration::from_secs(cfg.request_timeout_secs));

    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }

    if cfg.enable_multiplexing {
        builder = builder.http2_adaptive_window(true);
    } else {
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        builder = builder
            .http1_only()
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Duration::from_secs(0));
    }

    Ok(builder.default_headers(headers).build()?)
}
