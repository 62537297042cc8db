//! Walker cycle analysis.
//!
//! A walker starts on a node at step 0 and follows one edge per step, picking
//! the label the instruction tape shows at the current phase. Its state is
//! `(node, phase)`; the state space is finite and the successor function is
//! deterministic, so the trajectory repeats within `nodes * tape_len + 1`
//! steps. This module finds that repetition and summarises the accepting
//! steps as a [`CycleDescriptor`].

use crate::descriptor::CycleDescriptor;
use lockstep_types::{ConfigurationError, InstructionTape, NodeId, TransitionGraph};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Cycle detection strategy. Both produce identical descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detector {
    /// Remember the first step each state was seen. O(states) memory.
    #[default]
    HashMap,
    /// Tortoise and hare, then a replay to collect accepting steps. O(1) memory.
    Floyd,
}

impl FromStr for Detector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash_map" | "hashmap" => Ok(Detector::HashMap),
            "floyd" => Ok(Detector::Floyd),
            other => Err(format!(
                "unknown detector {:?} (expected \"hash_map\" or \"floyd\")",
                other
            )),
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detector::HashMap => write!(f, "hash_map"),
            Detector::Floyd => write!(f, "floyd"),
        }
    }
}

/// Position of a walker: the node it stands on and the tape phase it will
/// read next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct WalkerState {
    node: NodeId,
    phase: usize,
}

impl WalkerState {
    fn start(node: NodeId) -> Self {
        Self { node, phase: 0 }
    }
}

/// Analyse one walker with the default detector.
pub fn analyze(
    graph: &TransitionGraph,
    tape: &InstructionTape,
    start: NodeId,
) -> Result<CycleDescriptor, ConfigurationError> {
    analyze_with(graph, tape, start, Detector::default())
}

/// Analyse one walker with the given detector.
///
/// Fails before simulating anything if the tape is empty, a node lacks a
/// transition, or `start` is not in the graph.
pub fn analyze_with(
    graph: &TransitionGraph,
    tape: &InstructionTape,
    start: NodeId,
    detector: Detector,
) -> Result<CycleDescriptor, ConfigurationError> {
    check_inputs(graph, tape, start)?;

    let walk = Walk { graph, tape };
    let descriptor = match detector {
        Detector::HashMap => walk.detect_with_map(start)?,
        Detector::Floyd => walk.detect_with_floyd(start)?,
    };

    tracing::debug!(
        "walker {} ({}): {}",
        graph.name(start).unwrap_or("?"),
        detector,
        descriptor
    );
    Ok(descriptor)
}

fn check_inputs(
    graph: &TransitionGraph,
    tape: &InstructionTape,
    start: NodeId,
) -> Result<(), ConfigurationError> {
    if tape.is_empty() {
        return Err(ConfigurationError::EmptyTape);
    }
    if !graph.contains(start) {
        return Err(ConfigurationError::UnknownNode(start.to_string()));
    }
    graph.validate()
}

struct Walk<'a> {
    graph: &'a TransitionGraph,
    tape: &'a InstructionTape,
}

impl Walk<'_> {
    fn successor(&self, state: WalkerState) -> Result<WalkerState, ConfigurationError> {
        let label = self.tape.label(state.phase);
        let node = self.graph.transition(state.node, label).ok_or_else(|| {
            ConfigurationError::MissingTransition {
                node: self.graph.name(state.node).unwrap_or("?").to_string(),
                label,
            }
        })?;
        Ok(WalkerState {
            node,
            phase: (state.phase + 1) % self.tape.len(),
        })
    }

    fn detect_with_map(&self, start: NodeId) -> Result<CycleDescriptor, ConfigurationError> {
        let mut first_seen: HashMap<WalkerState, u64> = HashMap::new();
        let mut accepting_steps = Vec::new();
        let mut state = WalkerState::start(start);
        let mut step = 0u64;

        let tail_length = loop {
            match first_seen.entry(state) {
                Entry::Occupied(entry) => break *entry.get(),
                Entry::Vacant(entry) => {
                    entry.insert(step);
                }
            }
            if self.graph.is_accepting(state.node) {
                accepting_steps.push(step);
            }
            state = self.successor(state)?;
            step += 1;
        };

        Ok(partition(tail_length, step - tail_length, accepting_steps))
    }

    fn detect_with_floyd(&self, start: NodeId) -> Result<CycleDescriptor, ConfigurationError> {
        let origin = WalkerState::start(start);

        let mut tortoise = self.successor(origin)?;
        let mut hare = self.successor(self.successor(origin)?)?;
        while tortoise != hare {
            tortoise = self.successor(tortoise)?;
            hare = self.successor(self.successor(hare)?)?;
        }

        // First state of the cycle: walk both from origin and meeting point.
        let mut tail_length = 0u64;
        tortoise = origin;
        while tortoise != hare {
            tortoise = self.successor(tortoise)?;
            hare = self.successor(hare)?;
            tail_length += 1;
        }

        let mut cycle_length = 1u64;
        hare = self.successor(tortoise)?;
        while tortoise != hare {
            hare = self.successor(hare)?;
            cycle_length += 1;
        }

        let mut accepting_steps = Vec::new();
        let mut state = origin;
        for step in 0..tail_length + cycle_length {
            if self.graph.is_accepting(state.node) {
                accepting_steps.push(step);
            }
            state = self.successor(state)?;
        }

        Ok(partition(tail_length, cycle_length, accepting_steps))
    }
}

/// Split accepting steps `< tail_length + cycle_length` into tail hits and
/// cycle offsets.
fn partition(tail_length: u64, cycle_length: u64, accepting_steps: Vec<u64>) -> CycleDescriptor {
    let mut tail = BTreeSet::new();
    let mut offsets = BTreeSet::new();
    for step in accepting_steps {
        if step < tail_length {
            tail.insert(step);
        } else {
            offsets.insert((step - tail_length) % cycle_length);
        }
    }
    CycleDescriptor::from_parts(tail_length, cycle_length, tail, offsets)
}
