use serde::{Deserialize, Serialize};

use crate::meta::{Meta, Table};
use crate::request::RequestKind;

/// Body returned for a successful Insert.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SavedBody {
    pub saved: String,
    pub table: Table,
    pub location: RequestKind,
    pub version: String,
}

/// Body returned for a successful Update.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdatedBody {
    pub updated: String,
    pub table: Table,
    pub location: RequestKind,
    pub version: String,
}

/// Body returned for Search and Query.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemsBody {
    pub items: Vec<Meta>,
    pub table: Table,
    pub version: String,
}

/// Error body. Rejections only fill `error`; backend failures also echo the
/// request context, with `location` carrying the raw `type` value.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ErrorBody {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            table: None,
            location: None,
            version: None,
        }
    }
}
