//! Query parameters and their literal encoding.
//!
//! FalkorDB binds parameters from a `CYPHER name=value ...` header placed in
//! front of the query body, which refers to them as `$name`. Values therefore
//! never appear in the body itself, but the header is text, so every value is
//! encoded as a literal here: strings single-quoted with quotes and
//! backslashes doubled, numbers verbatim.

use std::fmt::Write as _;

use relgraph_core::Token;

/// A bindable parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Encode as a Cypher literal.
    pub fn to_literal(&self) -> String {
        let mut out = String::new();
        self.write_literal(&mut out);
        out
    }

    fn write_literal(&self, out: &mut String) {
        match self {
            Self::Str(s) => {
                out.push('\'');
                for c in s.chars() {
                    match c {
                        // Doubling keeps the literal closed. FalkorDB's parser
                        // expects `\'`, so a key holding `'` may fail as a query
                        // error instead of matching.
                        '\'' => out.push_str("''"),
                        '\\' => out.push_str("\\\\"),
                        _ => out.push(c),
                    }
                }
                out.push('\'');
            }
            Self::Int(i) => {
                let _ = write!(out, "{}", i);
            }
            Self::Float(f) if f.is_finite() => {
                let _ = write!(out, "{:?}", f);
            }
            Self::Float(_) => out.push_str("null"),
            Self::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Self::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_literal(out);
                }
                out.push(']');
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&[Token]> for ParamValue {
    fn from(tokens: &[Token]) -> Self {
        Self::List(tokens.iter().map(|t| Self::Str(t.as_str().to_string())).collect())
    }
}

/// Ordered parameter set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(&'static str, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing an earlier value of the same name.
    pub fn set(&mut self, name: &'static str, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    /// `CYPHER a=1 b='x' ` header, or `""` when there are no parameters.
    pub fn header(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut out = String::from("CYPHER");
        for (name, value) in &self.entries {
            out.push(' ');
            out.push_str(name);
            out.push('=');
            value.write_literal(&mut out);
        }
        out.push(' ');
        out
    }
}
