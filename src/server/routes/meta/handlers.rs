use super::{MetaCommand, MetaRequest, extract::MetaPreprocess};
use crate::error::MetaError;
use crate::server::API_VERSION;
use crate::server::router::MetaState;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use metagate_schema::{ItemsBody, SavedBody, UpdatedBody};
use tracing::debug;

pub(super) async fn meta_handler(
    State(state): State<MetaState>,
    MetaPreprocess(request): MetaPreprocess,
) -> Result<Response, MetaError> {
    let MetaRequest {
        table,
        kind,
        location,
        command,
    } = request;

    debug!(table = %table, kind = %kind, location = %location, "Incoming meta request");

    let backend = &state.backend;
    let backend_err = |source| MetaError::Backend {
        source,
        table,
        location: location.clone(),
    };
    let version = API_VERSION.to_string();

    let resp = match command {
        MetaCommand::Insert(draft) => {
            let saved = backend
                .insert_item(table, &draft)
                .await
                .map_err(backend_err)?;
            Json(SavedBody {
                saved,
                table,
                location: kind,
                version,
            })
            .into_response()
        }
        MetaCommand::Update { id, draft } => {
            let updated = backend
                .update_item(table, &id, &draft)
                .await
                .map_err(backend_err)?;
            Json(UpdatedBody {
                updated,
                table,
                location: kind,
                version,
            })
            .into_response()
        }
        MetaCommand::Search(pattern) => {
            let items = backend
                .search_items(table, &pattern)
                .await
                .map_err(backend_err)?;
            Json(ItemsBody {
                items,
                table,
                version,
            })
            .into_response()
        }
        MetaCommand::Query => {
            let items = backend.query_items(table).await.map_err(backend_err)?;
            Json(ItemsBody {
                items,
                table,
                version,
            })
            .into_response()
        }
    };

    Ok(resp)
}
