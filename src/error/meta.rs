use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

use super::BackendError;
use crate::server::API_VERSION;
use crate::server::guards::auth::AuthError;
use metagate_schema::{ErrorBody, Table};

/// Everything the meta route can answer with besides a success body.
#[derive(Debug, ThisError)]
pub enum MetaError {
    #[error("Request rejected: {message}")]
    RequestRejected {
        status: StatusCode,
        message: &'static str,
        debug_message: Option<String>,
    },

    #[error("Unsupported media type")]
    UnsupportedMediaType,

    #[error("Backend call failed for {location} on {table}: {source}")]
    Backend {
        source: BackendError,
        table: Table,
        location: String,
    },
}

impl MetaError {
    pub(crate) fn bad_request(message: &'static str) -> Self {
        MetaError::RequestRejected {
            status: StatusCode::BAD_REQUEST,
            message,
            debug_message: None,
        }
    }
}

impl From<AuthError> for MetaError {
    fn from(err: AuthError) -> Self {
        MetaError::RequestRejected {
            status: StatusCode::UNAUTHORIZED,
            message: err.reason(),
            debug_message: None,
        }
    }
}

impl IntoResponse for MetaError {
    fn into_response(self) -> Response {
        match self {
            MetaError::RequestRejected {
                status,
                message,
                debug_message,
            } => {
                if let Some(debug_message) = debug_message {
                    tracing::warn!(
                        status = %status,
                        message = %message,
                        debug_message = %debug_message,
                        "Meta request rejected"
                    );
                } else {
                    tracing::warn!(status = %status, message = %message, "Meta request rejected");
                }
                (status, Json(ErrorBody::message(message))).into_response()
            }

            MetaError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response(),

            MetaError::Backend {
                source,
                table,
                location,
            } => {
                tracing::error!(
                    table = %table,
                    location = %location,
                    error = %source,
                    "Meta backend call failed"
                );
                let body = ErrorBody {
                    error: source.to_string(),
                    table: Some(table),
                    location: Some(location),
                    version: Some(API_VERSION.to_string()),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
