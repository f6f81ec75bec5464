use crate::frontier::TieBreak;

/// Tunables for [`PathSearch`](crate::PathSearch).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Order of open nodes with equal total cost.
    pub tie_break: TieBreak,
    /// Stop after expanding this many nodes and fall back to the best-effort
    /// route. `None` searches until the open set runs dry.
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}
