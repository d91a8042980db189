use crate::error::MetaError;
use crate::server::guards::auth::RequireKeyAuth;
use crate::server::router::MetaState;
use crate::utils::logging::with_pretty_json_debug;
use axum::{
    body::to_bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{StatusCode, header::CONTENT_TYPE},
};
use metagate_schema::RequestPayload;
use tracing::debug;

use super::MetaRequest;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub(crate) struct MetaPreprocess(pub(crate) MetaRequest);

impl FromRequest<MetaState> for MetaPreprocess {
    type Rejection = MetaError;

    /// Validate a meta request before anything reaches the backend.
    ///
    /// Order of checks: `content-type` present (400), `content-type` mentions
    /// `application/json` (415), body decodes (400), required fields (400),
    /// then the `key` header (401). Payload problems are therefore reported
    /// even to callers without a valid key.
    async fn from_request(req: Request, state: &MetaState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let Some(content_type) = parts.headers.get(CONTENT_TYPE) else {
            return Err(MetaError::bad_request(
                "Please provide 'content-type' header.",
            ));
        };
        let is_json = content_type
            .to_str()
            .is_ok_and(|v| v.contains("application/json"));
        if !is_json {
            return Err(MetaError::UnsupportedMediaType);
        }

        let bytes = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| MetaError::RequestRejected {
                status: StatusCode::BAD_REQUEST,
                message: "Failed to read request body.",
                debug_message: Some(e.to_string()),
            })?;

        let payload: RequestPayload =
            serde_json::from_slice(&bytes).map_err(|e| MetaError::RequestRejected {
                status: StatusCode::BAD_REQUEST,
                message: "Invalid JSON payload.",
                debug_message: Some(e.to_string()),
            })?;

        with_pretty_json_debug(&payload, |pretty_body| {
            debug!(body = %pretty_body, "[Meta] Extracted request payload");
        });

        let request = MetaRequest::try_from(payload)?;

        RequireKeyAuth::from_request_parts(&mut parts, state).await?;

        Ok(Self(request))
    }
}
