use crate::error::MetaError;
use crate::server::router::MetaState;
use axum::{Router, routing::post};
use metagate_schema::{MetaDraft, RequestKind, RequestPayload, Table};

pub mod extract;
pub mod handlers;

/// A validated request, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaRequest {
    pub table: Table,
    pub kind: RequestKind,
    /// The `type` value exactly as sent.
    pub location: String,
    pub command: MetaCommand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Insert(MetaDraft),
    Update { id: String, draft: MetaDraft },
    Search(String),
    Query,
}

impl TryFrom<RequestPayload> for MetaRequest {
    type Error = MetaError;

    /// Field checks, in the order they are reported.
    fn try_from(payload: RequestPayload) -> Result<Self, Self::Error> {
        let location = payload
            .kind
            .ok_or_else(|| MetaError::bad_request("Missing 'type' parameter."))?;
        let kind = RequestKind::from_type(&location);
        let table = payload
            .table
            .ok_or_else(|| MetaError::bad_request("Missing 'table' parameter."))?;

        let command = match kind {
            RequestKind::Insert => {
                let draft = payload
                    .data
                    .as_ref()
                    .and_then(|data| data.draft())
                    .ok_or_else(|| MetaError::bad_request("Missing Insert data."))?;
                MetaCommand::Insert(draft)
            }
            RequestKind::Update => {
                let data = payload
                    .data
                    .ok_or_else(|| MetaError::bad_request("Missing Update data."))?;
                let draft = data
                    .draft()
                    .ok_or_else(|| MetaError::bad_request("Missing Update data."))?;
                let id = data
                    .id
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| MetaError::bad_request("Missing Update id."))?;
                MetaCommand::Update { id, draft }
            }
            RequestKind::Search => {
                let pattern = payload
                    .query
                    .ok_or_else(|| MetaError::bad_request("Missing Search query."))?;
                MetaCommand::Search(pattern)
            }
            RequestKind::Query => MetaCommand::Query,
        };

        Ok(Self {
            table,
            kind,
            location,
            command,
        })
    }
}

/// The meta handler answers on every path; other methods get 405.
pub fn router() -> Router<MetaState> {
    Router::new()
        .route("/", post(handlers::meta_handler))
        .route("/{*path}", post(handlers::meta_handler))
}
