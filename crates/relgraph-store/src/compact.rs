//! Decoding of the compact `GRAPH.QUERY` reply.
//!
//! A compact reply is `[header, rows, stats]`. Header entries are
//! `[column_type, name]` pairs, row cells are `[value_type, value]` pairs.
//! Pure mutations reply with `[stats]` only.

use redis::Value;
use tracing::debug;

use crate::client::{StoreError, StoreResult};
use crate::value::{GraphValue, Row};

const VALUE_NULL: i64 = 1;
const VALUE_STRING: i64 = 2;
const VALUE_INTEGER: i64 = 3;
const VALUE_BOOLEAN: i64 = 4;
const VALUE_DOUBLE: i64 = 5;
const VALUE_ARRAY: i64 = 6;
const VALUE_POINT: i64 = 11;

/// Zip header and rows into named-column rows.
///
/// Rows that are not arrays are skipped; a malformed outer structure is an error.
pub fn decode_compact(reply: &Value) -> StoreResult<Vec<Row>> {
    let sections = match reply {
        Value::Array(items) => items,
        other => {
            return Err(StoreError::Decode(format!(
                "expected [header, rows, stats], got {}",
                value_kind(other)
            )))
        }
    };

    match sections.len() {
        0 => return Err(StoreError::Decode("empty reply".to_string())),
        // [stats] only: a mutation without RETURN.
        1 => return Ok(Vec::new()),
        _ => {}
    }

    let columns = decode_header(&sections[0])?;

    let raw_rows = match &sections[1] {
        Value::Array(rows) => rows,
        other => {
            return Err(StoreError::Decode(format!(
                "expected rows array, got {}",
                value_kind(other)
            )))
        }
    };

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (index, raw) in raw_rows.iter().enumerate() {
        let Value::Array(cells) = raw else {
            debug!(index, kind = value_kind(raw), "skipping malformed result row");
            continue;
        };
        let mut row = Row::new();
        for (name, cell) in columns.iter().zip(cells.iter()) {
            row.insert(name.clone(), decode_cell(cell));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn decode_header(header: &Value) -> StoreResult<Vec<String>> {
    let Value::Array(entries) = header else {
        return Err(StoreError::Decode(format!(
            "expected header array, got {}",
            value_kind(header)
        )));
    };

    entries
        .iter()
        .map(|entry| match entry {
            Value::Array(pair) if pair.len() == 2 => text(&pair[1]),
            other => text(other),
        })
        .map(|name| name.ok_or_else(|| StoreError::Decode("unreadable column name".to_string())))
        .collect()
}

/// Decode a `[value_type, value]` cell, falling back to the raw value.
fn decode_cell(cell: &Value) -> GraphValue {
    if let Value::Array(pair) = cell {
        if let [Value::Int(kind), value] = pair.as_slice() {
            if (VALUE_NULL..=VALUE_POINT).contains(kind) {
                return decode_typed(*kind, value);
            }
        }
    }
    decode_raw(cell)
}

fn decode_typed(kind: i64, value: &Value) -> GraphValue {
    match kind {
        VALUE_NULL => GraphValue::Null,
        VALUE_STRING => text(value).map(GraphValue::Str).unwrap_or(GraphValue::Null),
        VALUE_INTEGER => match value {
            Value::Int(i) => GraphValue::Int(*i),
            other => text(other)
                .and_then(|s| s.parse().ok())
                .map(GraphValue::Int)
                .unwrap_or(GraphValue::Null),
        },
        VALUE_BOOLEAN => match value {
            Value::Boolean(b) => GraphValue::Bool(*b),
            Value::Int(i) => GraphValue::Bool(*i != 0),
            other => GraphValue::Bool(text(other).is_some_and(|s| s == "true")),
        },
        VALUE_DOUBLE => match value {
            Value::Double(f) => GraphValue::Float(*f),
            other => text(other)
                .and_then(|s| s.parse().ok())
                .map(GraphValue::Float)
                .unwrap_or(GraphValue::Null),
        },
        VALUE_ARRAY => match value {
            Value::Array(items) => GraphValue::List(items.iter().map(decode_cell).collect()),
            other => decode_raw(other),
        },
        // Nodes, edges, paths, maps and points are not projected by our queries.
        _ => decode_raw(value),
    }
}

fn decode_raw(value: &Value) -> GraphValue {
    match value {
        Value::Nil => GraphValue::Null,
        Value::Int(i) => GraphValue::Int(*i),
        Value::Double(f) => GraphValue::Float(*f),
        Value::Boolean(b) => GraphValue::Bool(*b),
        Value::BulkString(_) | Value::SimpleString(_) | Value::VerbatimString { .. } => {
            text(value).map(GraphValue::Str).unwrap_or(GraphValue::Null)
        }
        Value::Okay => GraphValue::Str("OK".to_string()),
        Value::Array(items) | Value::Set(items) => {
            GraphValue::List(items.iter().map(decode_raw).collect())
        }
        _ => GraphValue::Null,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::SimpleString(s) => Some(s.clone()),
        Value::VerbatimString { text, .. } => Some(text.clone()),
        Value::Okay => Some("OK".to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Int(_) => "integer",
        Value::BulkString(_) => "bulk string",
        Value::Array(_) => "array",
        Value::SimpleString(_) => "simple string",
        Value::Okay => "ok",
        Value::Double(_) => "double",
        Value::Boolean(_) => "boolean",
        _ => "other",
    }
}
