//! Defaults applied to requests that omit them.

use relgraph_core::{EventTypePolicy, RankMetric};

pub const DEFAULT_MAX_NODES: i64 = 200;
pub const DEFAULT_MAX_EDGES: i64 = 400;
pub const DEFAULT_MIN_EVENT_COUNT: i64 = 1;

/// Hop ceiling enforced in strict mode.
pub const STRICT_MAX_HOPS: i64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphSettings {
    pub default_max_nodes: i64,
    pub default_max_edges: i64,
    pub default_min_event_count: i64,
    pub rank: RankMetric,
    pub event_type_policy: EventTypePolicy,
    /// `None` allows any hop count.
    pub max_hops: Option<i64>,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            default_max_nodes: DEFAULT_MAX_NODES,
            default_max_edges: DEFAULT_MAX_EDGES,
            default_min_event_count: DEFAULT_MIN_EVENT_COUNT,
            rank: RankMetric::default(),
            event_type_policy: EventTypePolicy::Dynamic,
            max_hops: None,
        }
    }
}

impl GraphSettings {
    /// Build settings from raw configuration values. Non-positive budgets and
    /// a negative minimum count fall back to the built-in defaults.
    pub fn new(
        default_max_nodes: i64,
        default_max_edges: i64,
        default_min_event_count: i64,
        rank: RankMetric,
        strict: bool,
    ) -> Self {
        let settings = Self {
            default_max_nodes: positive_or(default_max_nodes, DEFAULT_MAX_NODES),
            default_max_edges: positive_or(default_max_edges, DEFAULT_MAX_EDGES),
            default_min_event_count: if default_min_event_count < 0 {
                DEFAULT_MIN_EVENT_COUNT
            } else {
                default_min_event_count
            },
            rank,
            ..Self::default()
        };
        if strict {
            settings.strict()
        } else {
            settings
        }
    }

    /// Curated event types and at most [`STRICT_MAX_HOPS`] hops.
    pub fn strict(mut self) -> Self {
        self.event_type_policy = EventTypePolicy::Curated;
        self.max_hops = Some(STRICT_MAX_HOPS);
        self
    }
}

fn positive_or(value: i64, fallback: i64) -> i64 {
    if value > 0 {
        value
    } else {
        fallback
    }
}
