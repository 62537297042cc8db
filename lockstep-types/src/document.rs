//! Parser for the textual map format.
//!
//! ```text
//! LLR
//!
//! AAA = (BBB, BBB)
//! BBB = (AAA, ZZZ)
//! ZZZ = (ZZZ, ZZZ)
//! ```
//!
//! The first line is the instruction tape; every following non-blank line
//! defines one node and its left/right targets.

use crate::error::{ConfigurationError, ParseError};
use crate::graph::{GraphBuilder, TransitionGraph};
use crate::pattern::NodePattern;
use crate::tape::InstructionTape;

/// One `NAME = (LEFT, RIGHT)` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDefinition {
    /// Node being defined.
    pub name: String,
    /// Target of the `L` edge.
    pub left: String,
    /// Target of the `R` edge.
    pub right: String,
}

/// A parsed map: instruction tape plus node definitions in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDocument {
    tape: InstructionTape,
    definitions: Vec<NodeDefinition>,
}

impl MapDocument {
    /// Parse a map document.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = text.lines();
        let tape = InstructionTape::parse(lines.next().unwrap_or(""))?;

        let mut definitions = Vec::new();
        for (i, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            // Line 1 is the tape, so the first node line is line 2.
            let definition = parse_node(line).ok_or_else(|| ParseError::MalformedNode {
                line: i + 2,
                text: line.to_string(),
            })?;
            definitions.push(definition);
        }

        Ok(Self { tape, definitions })
    }

    /// The instruction tape.
    pub fn tape(&self) -> &InstructionTape {
        &self.tape
    }

    /// Node definitions in file order.
    pub fn definitions(&self) -> &[NodeDefinition] {
        &self.definitions
    }

    /// Build the transition graph, flagging nodes matching `accept`.
    pub fn graph(&self, accept: &NodePattern) -> Result<TransitionGraph, ConfigurationError> {
        let mut builder = GraphBuilder::new();
        for def in &self.definitions {
            builder.add_node(&def.name, &def.left, &def.right);
        }
        builder.accepting(accept.clone()).build()
    }
}

fn parse_node(line: &str) -> Option<NodeDefinition> {
    let (name, targets) = line.split_once('=')?;
    let targets = targets.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (left, right) = targets.split_once(',')?;

    let name = node_name(name)?;
    let left = node_name(left)?;
    let right = node_name(right)?;
    Some(NodeDefinition {
        name,
        left,
        right,
    })
}

fn node_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(name.to_string())
}
