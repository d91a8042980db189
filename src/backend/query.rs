//! GraphQL documents for the meta tables.
//!
//! Documents are built by interpolation; every user-supplied value goes
//! through [`literal`] so it stays inside its string literal.

use metagate_schema::{MetaDraft, Table};
use serde_json::Value;

/// Renders `value` as a quoted GraphQL string literal.
///
/// JSON string escaping is a subset of GraphQL's, so serde_json does the work.
pub(crate) fn literal(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}

/// Escapes regex metacharacters so `value` matches itself under `_iregex`.
pub(crate) fn regex_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub(crate) fn query_items(table: Table) -> String {
    format!(
        r#"{{
  {relation}(order_by: {{name: asc}}) {{
    id
    name
    table
    schema
  }}
}}"#,
        relation = table.relation(),
    )
}

pub(crate) fn search_items(table: Table, pattern: &str) -> String {
    format!(
        r#"{{
  {relation}(
    order_by: {{name: asc}},
    where: {{name: {{_iregex: {pattern}}}}}
  ) {{
    id
    name
    table
    schema
  }}
}}"#,
        relation = table.relation(),
        pattern = literal(&format!(".*{pattern}.*")),
    )
}

pub(crate) fn insert_field(table: Table) -> String {
    format!("insert_{}_one", table.relation())
}

pub(crate) fn insert_item(table: Table, draft: &MetaDraft) -> String {
    format!(
        r#"mutation {{
  {field}(object: {{
    name: {name},
    table: {table},
    schema: {schema}
  }}) {{
    name
  }}
}}"#,
        field = insert_field(table),
        name = literal(&draft.name),
        table = literal(&draft.table),
        schema = literal(&draft.schema),
    )
}

pub(crate) fn update_field(table: Table) -> String {
    format!("update_{}", table.relation())
}

pub(crate) fn update_item(table: Table, id: &str, draft: &MetaDraft) -> String {
    format!(
        r#"mutation {{
  {field}(
    where: {{id: {{_eq: {id}}}}},
    _set: {{
      name: {name},
      table: {table},
      schema: {schema}
    }}
  ) {{
    returning {{
      name
    }}
  }}
}}"#,
        field = update_field(table),
        id = literal(id),
        name = literal(&draft.name),
        table = literal(&draft.table),
        schema = literal(&draft.schema),
    )
}
