//! Node/edge budget of a single traversal.

/// Remaining node and edge quota. Owned by one traversal call and passed
/// `&mut` through every expansion step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    pub remaining_nodes: i64,
    pub remaining_edges: i64,
    truncated: bool,
}

impl Budget {
    pub fn new(max_nodes: i64, max_edges: i64) -> Self {
        Self {
            remaining_nodes: max_nodes,
            remaining_edges: max_edges,
            truncated: false,
        }
    }

    /// Take one node slot. `false` (and truncation) when none is left.
    pub fn take_node(&mut self) -> bool {
        if self.remaining_nodes <= 0 {
            self.truncated = true;
            return false;
        }
        self.remaining_nodes -= 1;
        true
    }

    /// Take one edge slot. `false` (and truncation) when none is left.
    pub fn take_edge(&mut self) -> bool {
        if self.remaining_edges <= 0 {
            self.truncated = true;
            return false;
        }
        self.remaining_edges -= 1;
        true
    }

    /// Either counter has reached zero.
    pub fn exhausted(&self) -> bool {
        self.remaining_nodes <= 0 || self.remaining_edges <= 0
    }

    /// Mark the traversal incomplete. Never cleared.
    pub fn truncate(&mut self) {
        self.truncated = true;
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Share of the remaining edge budget a hop may spend, and the per-source cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopPlan {
    pub share_percent: i64,
    pub cap: i64,
}

impl HopPlan {
    /// Hop 1 gets half the budget, even hops 30%, later odd hops 20%.
    pub fn for_hop(hop: i64) -> Self {
        match hop {
            1 => Self { share_percent: 50, cap: 200 },
            h if h % 2 == 0 => Self { share_percent: 30, cap: 50 },
            _ => Self { share_percent: 20, cap: 30 },
        }
    }

    /// Rows each frontier member may return this hop, clamped to `[1, cap]`.
    /// `0` means there is no edge budget left to spend.
    pub fn per_source_limit(&self, remaining_edges: i64, frontier_len: usize) -> i64 {
        if remaining_edges <= 0 || frontier_len == 0 {
            return 0;
        }
        let total = remaining_edges.saturating_mul(self.share_percent) / 100;
        let per_source = total / frontier_len as i64;
        per_source.clamp(1, self.cap)
    }
}
