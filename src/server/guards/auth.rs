use crate::server::router::MetaState;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use metagate_schema::ErrorBody;
use subtle::ConstantTimeEq;

/// Header carrying the pre-shared key.
pub const KEY_HEADER: &str = "key";

/// Raw header bytes; an empty value counts as no key at all.
fn extract_header_key(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(KEY_HEADER)
        .map(HeaderValue::as_bytes)
        .filter(|v| !v.is_empty())
}

/// Rejects requests whose `key` header is absent or does not match the configured key.
#[derive(Debug, Clone, Copy)]
pub struct RequireKeyAuth;

impl FromRequestParts<MetaState> for RequireKeyAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &MetaState,
    ) -> Result<Self, Self::Rejection> {
        match extract_header_key(&parts.headers) {
            Some(key) => {
                let expected = state.auth_key.as_ref();
                if key.ct_eq(expected.as_bytes()).into() {
                    Ok(RequireKeyAuth)
                } else {
                    Err(AuthError::InvalidKey)
                }
            }
            None => Err(AuthError::MissingKey),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingKey,
    InvalidKey,
}

impl AuthError {
    pub fn reason(self) -> &'static str {
        match self {
            AuthError::MissingKey => "Missing 'key' header.",
            AuthError::InvalidKey => "You're not authorized to access this API.",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody::message(self.reason())),
        )
            .into_response()
    }
}
