//! Neighbour ranking metric.

use serde::{Deserialize, Serialize};

/// Edge property used to order neighbours before a hop's limit is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    #[default]
    EventCount30d,
    EventCount,
    TotalAmount,
}

impl RankMetric {
    pub const ALL: [RankMetric; 3] = [Self::EventCount30d, Self::EventCount, Self::TotalAmount];

    /// Edge property name. Always one of a fixed set, safe for query text.
    pub fn property(&self) -> &'static str {
        match self {
            Self::EventCount30d => "event_count_30d",
            Self::EventCount => "event_count",
            Self::TotalAmount => "total_amount",
        }
    }

    /// Parse a property name, falling back to the default on anything unknown.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "event_count" => Self::EventCount,
            "total_amount" => Self::TotalAmount,
            _ => Self::EventCount30d,
        }
    }
}
