//! Validated identifier tokens.
//!
//! Relationship types cannot be bound as query parameters, so they reach the
//! query text verbatim. A [`Token`] can only be built through [`Token::parse`],
//! which enforces the `[A-Z0-9_-]+` character class first.

use std::fmt;

use serde::Serialize;

use crate::error::{ValidationError, ValidationResult};

/// Event types accepted under [`EventTypePolicy::Curated`].
pub const CURATED_EVENT_TYPES: &[&str] = &[
    "LOGIN",
    "LOGOUT",
    "REGISTER",
    "PASSWORD_CHANGE",
    "PROFILE_UPDATE",
    "ACCOUNT_UPDATE",
    "KYC",
    "KYC_UPDATE",
    "PAYMENT",
    "TRANSACTION",
    "WITHDRAWAL",
    "CUSTOMER_EVENT",
    "MANUAL",
];

/// An uppercase identifier safe to interpolate into query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Trim, uppercase and validate `raw`. `what` names the field in errors.
    pub fn parse(what: &'static str, raw: &str) -> ValidationResult<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::Missing(what));
        }
        let valid = normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !valid {
            return Err(ValidationError::InvalidToken {
                what,
                value: raw.to_string(),
            });
        }
        Ok(Self(normalized))
    }

    /// Shorthand for validating an edge type.
    pub fn edge_type(raw: &str) -> ValidationResult<Self> {
        Self::parse("edge_type", raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which event types the ingestion path accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventTypePolicy {
    /// Any well-formed token.
    #[default]
    Dynamic,
    /// Only the members of [`CURATED_EVENT_TYPES`].
    Curated,
}

impl EventTypePolicy {
    /// Validate an incoming event type under this policy.
    pub fn parse_event_type(&self, raw: &str) -> ValidationResult<Token> {
        let token = Token::parse("event_type", raw)?;
        match self {
            Self::Dynamic => Ok(token),
            Self::Curated if CURATED_EVENT_TYPES.contains(&token.as_str()) => Ok(token),
            Self::Curated => Err(ValidationError::UnsupportedEventType(token.into_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_uppercases() {
        let token = Token::edge_type(" payment_1 ").unwrap();
        assert_eq!(token.as_str(), "PAYMENT_1");
    }

    #[test]
    fn test_accepts_hyphen_and_digits() {
        assert_eq!(Token::edge_type("p2p-transfer").unwrap().as_str(), "P2P-TRANSFER");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Token::edge_type("   "), Err(ValidationError::Missing("edge_type")));
    }

    #[test]
    fn test_rejects_invalid_chars() {
        for raw in ["bad type!", "A'B", "X]->(n) DELETE n //", "A`B", "ÄRGER", "a.b"] {
            let err = Token::edge_type(raw).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidToken { .. }), "{raw}");
        }
    }

    #[test]
    fn test_non_ascii_is_not_folded() {
        for raw in ["straße", "ﬁle", "ǆ"] {
            assert_eq!(
                Token::edge_type(raw),
                Err(ValidationError::InvalidToken {
                    what: "edge_type",
                    value: raw.to_string(),
                }),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_curated_policy() {
        let policy = EventTypePolicy::Curated;
        assert_eq!(policy.parse_event_type("login").unwrap().as_str(), "LOGIN");
        assert_eq!(
            policy.parse_event_type("CRYPTO_SWAP"),
            Err(ValidationError::UnsupportedEventType("CRYPTO_SWAP".to_string()))
        );
    }

    #[test]
    fn test_dynamic_policy_accepts_new_types() {
        let policy = EventTypePolicy::Dynamic;
        assert_eq!(policy.parse_event_type("crypto_swap").unwrap().as_str(), "CRYPTO_SWAP");
        assert!(policy.parse_event_type("crypto swap").is_err());
    }
}
