//! GraphQL-over-HTTP envelope as spoken by the Hasura backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt};

/// Outbound request body. Documents are sent without variables.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
}

/// Inbound response envelope.
///
/// `data` is kept as a raw JSON object keyed by root field (`meta_genres`,
/// `insert_meta_genres_one`, ...); callers decode the field they asked for.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlError>>,
}

impl GraphqlResponse {
    /// Takes the error list out of the envelope when it is non-empty.
    pub fn take_errors(&mut self) -> Option<Vec<GraphqlError>> {
        self.errors.take().filter(|errors| !errors.is_empty())
    }

    /// Removes and returns the root field `key` from `data`, if any.
    pub fn take_field(&mut self, key: &str) -> Option<Value> {
        self.data
            .as_mut()
            .and_then(|data| data.remove(key))
            .filter(|value| !value.is_null())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<GraphqlErrorExtensions>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GraphqlErrorExtensions {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extensions.as_ref().and_then(|ext| ext.path.as_deref()) {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
