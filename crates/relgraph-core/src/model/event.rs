//! Customer activity events and target selection.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::node::NodeType;
use crate::error::{ValidationError, ValidationResult};

/// Event time as sent by producers: RFC 3339 text or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl EventTimestamp {
    /// Normalize to epoch milliseconds.
    pub fn to_millis(&self) -> ValidationResult<i64> {
        match self {
            Self::Millis(ms) => Ok(*ms),
            Self::FractionalMillis(ms) if ms.is_finite() => Ok(ms.trunc() as i64),
            Self::FractionalMillis(ms) => Err(ValidationError::InvalidTimestamp(ms.to_string())),
            Self::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.timestamp_millis())
                .map_err(|_| ValidationError::InvalidTimestamp(text.clone())),
        }
    }
}

/// One customer activity event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerEvent {
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id_mpan: Option<String>,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub event_timestamp: Option<EventTimestamp>,
    #[serde(default, rename = "total_transaction_amount", skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_bank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// Accepted for compatibility; never stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

/// The counterpart node an event's edge points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub node_type: NodeType,
    pub key: String,
}

impl CustomerEvent {
    /// Pick the edge target. First non-empty selector wins, in the order
    /// merchant, exchange, wallet, payment method, issuing bank, device.
    pub fn choose_target(&self) -> Option<Target> {
        let selectors = [
            (NodeType::Merchant, &self.merchant_id_mpan),
            (NodeType::Exchange, &self.exchange),
            (NodeType::Wallet, &self.wallet_address),
            (NodeType::PaymentMethod, &self.payment_method),
            (NodeType::Bank, &self.issuing_bank),
            (NodeType::Device, &self.device_id),
        ];

        selectors.into_iter().find_map(|(node_type, value)| {
            let key = value.as_deref()?.trim();
            (!key.is_empty()).then(|| Target {
                node_type,
                key: key.to_string(),
            })
        })
    }

    /// Event time in epoch milliseconds.
    pub fn timestamp_millis(&self) -> ValidationResult<i64> {
        self.event_timestamp
            .as_ref()
            .ok_or(ValidationError::Missing("event_timestamp"))?
            .to_millis()
    }
}
