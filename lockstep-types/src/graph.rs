//! The transition graph: an immutable arena of nodes addressed by [`NodeId`].
//!
//! Every node has exactly two outgoing edge slots (one per [`Label`]) and an
//! accepting flag. Graphs are assembled with a [`GraphBuilder`] and never
//! mutated afterwards, so one graph can be shared read-only by any number of
//! concurrent walker analyses.

use crate::error::ConfigurationError;
use crate::ids::{Label, NodeId};
use crate::pattern::NodePattern;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    edges: [Option<NodeId>; 2],
    accepting: bool,
}

/// A finite deterministic labeled transition system.
#[derive(Clone)]
pub struct TransitionGraph {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl TransitionGraph {
    /// Start assembling a graph.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Number of nodes, including referenced-but-undefined ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if `id` belongs to this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Look up a node by name.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Name of a node, if it belongs to this graph.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.name.as_str())
    }

    /// Check if a node is accepting. Unknown ids are never accepting.
    pub fn is_accepting(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(|n| n.accepting)
    }

    /// Target of the `label` edge leaving `id`, if both exist.
    pub fn transition(&self, id: NodeId, label: Label) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|n| n.edges[label.slot()])
    }

    /// Iterate over all node ids in id order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId::new(i as u32))
    }

    /// Ids of all nodes whose name matches `pattern`, in id order.
    pub fn select(&self, pattern: &NodePattern) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&id| pattern.matches(&self.nodes[id.index()].name))
            .collect()
    }

    /// Number of accepting nodes.
    pub fn accepting_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.accepting).count()
    }

    /// Check that every node has both labeled transitions.
    ///
    /// Reports the first incomplete node in id order.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for node in &self.nodes {
            for label in Label::ALL {
                if node.edges[label.slot()].is_none() {
                    return Err(ConfigurationError::MissingTransition {
                        node: node.name.clone(),
                        label,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for TransitionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionGraph")
            .field("nodes", &self.nodes.len())
            .field("accepting", &self.accepting_count())
            .finish()
    }
}

/// Assembles a [`TransitionGraph`] from `NAME = (LEFT, RIGHT)` definitions.
///
/// Names referenced as edge targets are interned on first sight, so ids
/// follow first-appearance order. A referenced name that is never defined
/// keeps empty edge slots and fails [`TransitionGraph::validate`].
pub struct GraphBuilder {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
    defined: Vec<bool>,
    duplicate: Option<String>,
    accepting: Option<Box<dyn Fn(&str) -> bool>>,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            defined: Vec::new(),
            duplicate: None,
            accepting: None,
        }
    }

    /// Define a node and its two transitions (chaining form).
    pub fn node(mut self, name: &str, left: &str, right: &str) -> Self {
        self.add_node(name, left, right);
        self
    }

    /// Define a node and its two transitions.
    pub fn add_node(&mut self, name: &str, left: &str, right: &str) -> &mut Self {
        let id = self.intern(name);
        if self.defined[id.index()] {
            if self.duplicate.is_none() {
                self.duplicate = Some(name.to_string());
            }
            return self;
        }
        let left = self.intern(left);
        let right = self.intern(right);
        self.nodes[id.index()].edges = [Some(left), Some(right)];
        self.defined[id.index()] = true;
        self
    }

    /// Flag every node whose name satisfies `predicate` as accepting.
    pub fn accepting_where(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.accepting = Some(Box::new(predicate));
        self
    }

    /// Flag every node matching `pattern` as accepting.
    pub fn accepting(self, pattern: NodePattern) -> Self {
        self.accepting_where(move |name| pattern.matches(name))
    }

    /// Freeze the graph.
    ///
    /// Fails if any node was defined twice. Missing transitions are not
    /// checked here; see [`TransitionGraph::validate`].
    pub fn build(self) -> Result<TransitionGraph, ConfigurationError> {
        if let Some(name) = self.duplicate {
            return Err(ConfigurationError::DuplicateNode(name));
        }
        let mut nodes = self.nodes;
        if let Some(predicate) = &self.accepting {
            for node in &mut nodes {
                node.accepting = predicate(&node.name);
            }
        }
        Ok(TransitionGraph {
            nodes,
            index: self.index,
        })
    }

    fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.to_string(),
            edges: [None, None],
            accepting: false,
        });
        self.defined.push(false);
        self.index.insert(name.to_string(), id);
        id
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_loop() -> TransitionGraph {
        TransitionGraph::builder()
            .node("AAA", "BBB", "BBB")
            .node("BBB", "AAA", "ZZZ")
            .node("ZZZ", "ZZZ", "ZZZ")
            .accepting(NodePattern::Name("ZZZ".into()))
            .build()
            .unwrap()
    }

    #[test]
    fn ids_follow_first_appearance() {
        let graph = two_loop();
        assert_eq!(graph.lookup("AAA"), Some(NodeId::new(0)));
        assert_eq!(graph.lookup("BBB"), Some(NodeId::new(1)));
        assert_eq!(graph.lookup("ZZZ"), Some(NodeId::new(2)));
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn transitions_resolve_by_label() {
        let graph = two_loop();
        let bbb = graph.lookup("BBB").unwrap();
        assert_eq!(graph.transition(bbb, Label::Left), graph.lookup("AAA"));
        assert_eq!(graph.transition(bbb, Label::Right), graph.lookup("ZZZ"));
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn accepting_flags_follow_predicate() {
        let graph = two_loop();
        assert!(graph.is_accepting(graph.lookup("ZZZ").unwrap()));
        assert!(!graph.is_accepting(graph.lookup("AAA").unwrap()));
        assert_eq!(graph.accepting_count(), 1);
    }

    #[test]
    fn no_accepting_predicate_means_no_accepting_nodes() {
        let graph = TransitionGraph::builder()
            .node("A", "A", "A")
            .build()
            .unwrap();
        assert_eq!(graph.accepting_count(), 0);
    }

    #[test]
    fn undefined_reference_fails_validation() {
        let graph = TransitionGraph::builder()
            .node("AAA", "BBB", "AAA")
            .build()
            .unwrap();
        assert_eq!(
            graph.validate(),
            Err(ConfigurationError::MissingTransition {
                node: "BBB".into(),
                label: Label::Left,
            })
        );
    }

    #[test]
    fn duplicate_definition_is_rejected() {
        let result = TransitionGraph::builder()
            .node("AAA", "AAA", "AAA")
            .node("AAA", "AAA", "AAA")
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::DuplicateNode("AAA".into())
        );
    }

    #[test]
    fn select_returns_matches_in_id_order() {
        let graph = TransitionGraph::builder()
            .node("22A", "11A", "11A")
            .node("11A", "22A", "22A")
            .node("11B", "11B", "11B")
            .build()
            .unwrap();
        let starts = graph.select(&NodePattern::Suffix("A".into()));
        assert_eq!(starts, vec![NodeId::new(0), NodeId::new(1)]);
    }

    #[test]
    fn unknown_ids_are_inert() {
        let graph = two_loop();
        let stray = NodeId::new(99);
        assert!(!graph.contains(stray));
        assert!(!graph.is_accepting(stray));
        assert_eq!(graph.transition(stray, Label::Left), None);
        assert_eq!(graph.name(stray), None);
    }

    #[test]
    fn graph_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransitionGraph>();
    }
}
