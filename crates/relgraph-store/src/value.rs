//! Loosely typed values returned by the store, and their coercions.

use std::collections::HashMap;

use thiserror::Error;

/// A decoded cell of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<GraphValue>),
}

/// A value could not be normalized to the requested representation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot coerce {found} to {expected}")]
pub struct CoercionError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl GraphValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
        }
    }

    fn fail(&self, expected: &'static str) -> CoercionError {
        CoercionError {
            expected,
            found: self.kind(),
        }
    }

    /// Normalize to an integer.
    ///
    /// Precedence: native integer, native float (finite, truncated), numeric
    /// string. Everything else is a [`CoercionError`].
    pub fn as_i64(&self) -> Result<i64, CoercionError> {
        match self {
            Self::Int(i) => Ok(*i),
            Self::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
            Self::Str(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(i);
                }
                match s.parse::<f64>() {
                    Ok(f) if f.is_finite() => Ok(f.trunc() as i64),
                    _ => Err(self.fail("integer")),
                }
            }
            _ => Err(self.fail("integer")),
        }
    }

    /// Normalize to a float. Same precedence as [`GraphValue::as_i64`].
    pub fn as_f64(&self) -> Result<f64, CoercionError> {
        match self {
            Self::Int(i) => Ok(*i as f64),
            Self::Float(f) => Ok(*f),
            Self::Str(s) => s.trim().parse::<f64>().map_err(|_| self.fail("float")),
            _ => Err(self.fail("float")),
        }
    }

    /// Interpret as a flag: booleans, non-zero integers, `"true"` / `"1"`.
    /// Anything else is `false`.
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => matches!(s.trim(), "true" | "1"),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// One result row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: HashMap<String, GraphValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, GraphValue)>,
        K: Into<String>,
    {
        Self {
            columns: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: GraphValue) {
        self.columns.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&GraphValue> {
        self.columns.get(column)
    }

    /// String column, or `""` when absent or not a string.
    pub fn str(&self, column: &str) -> &str {
        self.get(column).and_then(GraphValue::as_str).unwrap_or("")
    }

    pub fn i64(&self, column: &str) -> Result<i64, CoercionError> {
        self.get(column).unwrap_or(&GraphValue::Null).as_i64()
    }

    pub fn f64(&self, column: &str) -> Result<f64, CoercionError> {
        self.get(column).unwrap_or(&GraphValue::Null).as_f64()
    }

    pub fn flag(&self, column: &str) -> bool {
        self.get(column).is_some_and(GraphValue::as_flag)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<&str> for GraphValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for GraphValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for GraphValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for GraphValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for GraphValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
