use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{convert::Infallible, fmt, str::FromStr};

use crate::meta::{Meta, Table};

/// The `type` discriminator of an inbound request.
///
/// Unrecognised values fall through to [`RequestKind::Query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Insert,
    Update,
    Search,
    Query,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Insert => "Insert",
            RequestKind::Update => "Update",
            RequestKind::Search => "Search",
            RequestKind::Query => "Query",
        }
    }

    /// Maps a raw `type` value to the operation it dispatches to.
    pub fn from_type(raw: &str) -> Self {
        match raw {
            "Insert" => RequestKind::Insert,
            "Update" => RequestKind::Update,
            "Search" => RequestKind::Search,
            _ => RequestKind::Query,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_type(s))
    }
}

impl Serialize for RequestKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Inbound request body.
///
/// Empty strings for `type`, `table` and `query` count as absent, so the
/// router reports them as missing instead of dispatching on them. `type` is
/// kept verbatim; error envelopes echo it back as `location`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequestPayload {
    #[serde(rename = "type")]
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "deserialize_non_empty")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Meta>,

    #[serde(default, deserialize_with = "deserialize_non_empty")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

fn deserialize_non_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => raw.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
