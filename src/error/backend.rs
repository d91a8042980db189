use reqwest::StatusCode;
use thiserror::Error as ThisError;

use metagate_schema::{GraphqlError, Table};

/// Failures raised by the GraphQL backend client.
///
/// Messages carry the operation and table so they can be returned to callers
/// as-is; GraphQL failures also embed the document that was sent.
#[derive(Debug, ThisError)]
pub enum BackendError {
    #[error("({operation}) - {table}:\n{}\n{query}", render_graphql_errors(.errors))]
    Graphql {
        operation: &'static str,
        table: Table,
        errors: Vec<GraphqlError>,
        query: String,
    },

    #[error("({operation}) - {table}: Meta `{name}` already exists.")]
    AlreadyExists {
        operation: &'static str,
        table: Table,
        name: String,
    },

    #[error("({operation}) - {table}: no record with id `{id}`.")]
    NotFound {
        operation: &'static str,
        table: Table,
        id: String,
    },

    #[error("({operation}) - {table}: response carried no `{field}` data.")]
    MissingData {
        operation: &'static str,
        table: Table,
        field: String,
    },

    #[error("({operation}) - {table}: upstream returned {status}: {body:.300}")]
    UpstreamStatus {
        operation: &'static str,
        table: Table,
        status: StatusCode,
        /// Raw upstream body, truncated when rendered.
        body: String,
    },

    /// Transport-level failure (DNS, connect, timeouts, etc).
    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn render_graphql_errors(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
