//! Node types and graph nodes.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::ids::node_id;

/// The closed set of node kinds stored in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    User,
    Merchant,
    Exchange,
    Wallet,
    PaymentMethod,
    Bank,
    Device,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        Self::User,
        Self::Merchant,
        Self::Exchange,
        Self::Wallet,
        Self::PaymentMethod,
        Self::Bank,
        Self::Device,
    ];

    /// Wire name, e.g. `PAYMENT_METHOD`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Merchant => "MERCHANT",
            Self::Exchange => "EXCHANGE",
            Self::Wallet => "WALLET",
            Self::PaymentMethod => "PAYMENT_METHOD",
            Self::Bank => "BANK",
            Self::Device => "DEVICE",
        }
    }

    /// Store node label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Merchant => "Merchant",
            Self::Exchange => "Exchange",
            Self::Wallet => "Wallet",
            Self::PaymentMethod => "PaymentMethod",
            Self::Bank => "Bank",
            Self::Device => "Device",
        }
    }

    /// Property holding the node's domain key.
    pub fn key_property(&self) -> &'static str {
        match self {
            Self::User => "user_id",
            Self::Merchant => "merchant_id_mpan",
            Self::Exchange => "exchange",
            Self::Wallet => "wallet_address",
            Self::PaymentMethod => "payment_method",
            Self::Bank => "issuing_bank",
            Self::Device => "device_id",
        }
    }

    /// Human-readable prefix used in node display labels.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Merchant => "Merchant",
            Self::Exchange => "Exchange",
            Self::Wallet => "Wallet",
            Self::PaymentMethod => "Payment method",
            Self::Bank => "Bank",
            Self::Device => "Device",
        }
    }

    /// Every type other than `USER` is an entity.
    pub fn is_entity(&self) -> bool {
        !matches!(self, Self::User)
    }

    /// Parse a wire name exactly, as emitted by the store's type markers.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Parse user input: trimmed, case-insensitive.
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::Missing("type"));
        }
        Self::from_wire(&normalized).ok_or(ValidationError::UnknownNodeType(normalized))
    }
}

/// A `{type, key}` pair as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub key: String,
}

impl NodeRef {
    pub fn new(node_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            key: key.into(),
        }
    }
}

/// A node in a subgraph response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub key: String,
    pub label: String,
}

impl GraphNode {
    pub fn new(node_type: NodeType, key: &str) -> Self {
        Self {
            id: node_id(node_type, key),
            node_type,
            key: key.to_string(),
            label: format!("{} {}", node_type.display_name(), key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(NodeType::parse(" merchant ").unwrap(), NodeType::Merchant);
        assert_eq!(NodeType::parse("payment_method").unwrap(), NodeType::PaymentMethod);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            NodeType::parse("UNKNOWN"),
            Err(ValidationError::UnknownNodeType("UNKNOWN".to_string()))
        );
        assert_eq!(NodeType::parse(""), Err(ValidationError::Missing("type")));
    }

    #[test]
    fn test_label_and_key_property() {
        assert_eq!(NodeType::Merchant.label(), "Merchant");
        assert_eq!(NodeType::Merchant.key_property(), "merchant_id_mpan");
        assert_eq!(NodeType::Bank.key_property(), "issuing_bank");
    }

    #[test]
    fn test_graph_node_label() {
        let node = GraphNode::new(NodeType::Device, "d1");
        assert_eq!(node.id, "DEVICE:d1");
        assert_eq!(node.label, "Device d1");
    }

    #[test]
    fn test_serializes_wire_names() {
        let json = serde_json::to_string(&NodeType::PaymentMethod).unwrap();
        assert_eq!(json, "\"PAYMENT_METHOD\"");
    }
}
