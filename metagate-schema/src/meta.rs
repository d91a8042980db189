use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// The fixed set of lookup tables served by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Categories,
    Genres,
    Platforms,
    Tags,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Categories,
        Table::Genres,
        Table::Platforms,
        Table::Tags,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::Genres => "genres",
            Table::Platforms => "platforms",
            Table::Tags => "tags",
        }
    }

    /// Name of the backing relation on the GraphQL side, e.g. `meta_genres`.
    pub fn relation(self) -> String {
        format!("meta_{}", self.as_str())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTable(pub String);

impl fmt::Display for UnknownTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown table `{}`, expected one of categories, genres, platforms, tags",
            self.0
        )
    }
}

impl std::error::Error for UnknownTable {}

impl FromStr for Table {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| UnknownTable(s.to_string()))
    }
}

/// A named entry in one of the lookup tables.
///
/// Every field is optional on the wire; `id` is assigned by the backend and may
/// arrive as either a string or a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "deserialize_id_lax")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// The writable part of a [`Meta`], with every field present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaDraft {
    pub name: String,
    pub table: String,
    pub schema: String,
}

impl Meta {
    /// Returns the draft when `name`, `table` and `schema` are all set. `id` is not required.
    pub fn draft(&self) -> Option<MetaDraft> {
        Some(MetaDraft {
            name: self.name.clone()?,
            table: self.table.clone()?,
            schema: self.schema.clone()?,
        })
    }
}

fn deserialize_id_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom(
            "expected a string or a number for meta id",
        )),
    }
}
