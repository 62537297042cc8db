//! Name-based node selection.

use serde::{Deserialize, Serialize};

/// Selects nodes by name.
///
/// Used to pick the start node of every walker and to flag accepting nodes.
/// In TOML a pattern is written as `{ suffix = "A" }`, `{ name = "AAA" }`,
/// `{ prefix = "1" }` or the bare string `"any"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodePattern {
    /// Exactly this name.
    Name(String),
    /// Names starting with this string.
    Prefix(String),
    /// Names ending with this string.
    Suffix(String),
    /// Every node.
    Any,
}

impl NodePattern {
    /// Check whether a node name matches.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NodePattern::Name(exact) => name == exact,
            NodePattern::Prefix(prefix) => name.starts_with(prefix.as_str()),
            NodePattern::Suffix(suffix) => name.ends_with(suffix.as_str()),
            NodePattern::Any => true,
        }
    }
}
