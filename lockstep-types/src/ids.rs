//! Node handles and edge labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a node inside a [`TransitionGraph`](crate::TransitionGraph).
///
/// Ids are dense indices into the graph's arena, assigned in the order nodes
/// first appear. They are only meaningful for the graph that issued them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a NodeId from a raw arena index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw arena index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// One of the two outgoing edge labels every node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// The first (left) transition.
    Left,
    /// The second (right) transition.
    Right,
}

impl Label {
    /// Both labels, in slot order.
    pub const ALL: [Label; 2] = [Label::Left, Label::Right];

    /// Parse a label from its instruction character (`L` or `R`).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'L' => Some(Label::Left),
            'R' => Some(Label::Right),
            _ => None,
        }
    }

    /// Slot index of this label in a node's transition pair.
    pub fn slot(&self) -> usize {
        match self {
            Label::Left => 0,
            Label::Right => 1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Left => write!(f, "L"),
            Label::Right => write!(f, "R"),
        }
    }
}
