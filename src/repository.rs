//! Row building and defensive row decoding shared by the entity repositories.
//!
//! Decoding never fails a whole batch. Every element of a `select` answer is
//! turned into `Result<T, RowError>` and only the successes are kept; the rest
//! are logged and dropped. Missing or mistyped scalar columns fall back to a
//! default instead of failing the row.

use crate::store::{Row, SelectQuery, Store};
use crate::timestamp;
use crate::utils::new_row_id;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("column {column} holds a JSON {kind}, expected a scalar")]
    NonScalar { column: String, kind: &'static str },
}

/// Build a row from `(column, value)` pairs.
pub fn row<const N: usize>(fields: [(&str, Value); N]) -> Row {
    fields
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

pub const fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn scalar<'a>(row: &'a Row, column: &str) -> Result<Option<&'a Value>, RowError> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(v @ (Value::Array(_) | Value::Object(_))) => Err(RowError::NonScalar {
            column: column.to_string(),
            kind: json_kind(v),
        }),
        Some(v) => Ok(Some(v)),
    }
}

/// Text content of a column; numbers and booleans are rendered as text.
pub fn string_field(row: &Row, column: &str) -> Result<String, RowError> {
    let text = match scalar(row, column)? {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };
    Ok(text)
}

/// Numeric column, also accepting numbers the store quoted as strings.
pub fn f64_field(row: &Row, column: &str) -> Result<f64, RowError> {
    let value = match scalar(row, column)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(value.unwrap_or(0.0))
}

pub fn i32_field(row: &Row, column: &str) -> Result<i32, RowError> {
    let value = match scalar(row, column)? {
        Some(Value::Number(n)) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(value.unwrap_or(0))
}

/// Row identity, or a fresh id when the store did not return one.
pub fn id_field(row: &Row) -> Result<String, RowError> {
    let id = string_field(row, "id")?;
    Ok(if id.is_empty() { new_row_id() } else { id })
}

/// Timestamp column; unparseable or missing text decodes to the current time.
pub fn timestamp_field(row: &Row, column: &str) -> Result<DateTime<Utc>, RowError> {
    Ok(timestamp::decode(&string_field(row, column)?))
}

fn decode_element<T>(
    element: Value,
    decode: impl Fn(&Row) -> Result<T, RowError>,
) -> Result<T, RowError> {
    match element {
        Value::Object(row) => decode(&row),
        other => Err(RowError::NotAnObject(json_kind(&other))),
    }
}

/// Decode every element, keeping successes in their original order.
pub fn decode_rows<T>(
    table: &str,
    elements: Vec<Value>,
    decode: impl Fn(&Row) -> Result<T, RowError>,
) -> Vec<T> {
    let total = elements.len();
    let decoded: Vec<T> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(idx, element)| match decode_element(element, &decode) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(table, idx, err = %e, "skipping row");
                None
            }
        })
        .collect();

    if decoded.len() != total {
        tracing::warn!(table, total, kept = decoded.len(), "some rows were dropped");
    }
    decoded
}

/// Run `query` and decode the answer. A failed select degrades to no rows.
pub fn fetch<T>(
    store: &dyn Store,
    query: &SelectQuery,
    decode: impl Fn(&Row) -> Result<T, RowError>,
) -> Vec<T> {
    match store.select(query) {
        Ok(elements) => decode_rows(&query.table, elements, decode),
        Err(e) => {
            let filters = Value::Object(query.filters.clone());
            tracing::error!(
                table = %query.table,
                %filters,
                err = %e,
                "select failed; returning no data"
            );
            Vec::new()
        }
    }
}
