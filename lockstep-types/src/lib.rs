//! # lockstep-types
//!
//! Foundational types for the lockstep walker synchronizer.
//!
//! This crate provides the types shared by every lockstep crate:
//! - [`NodeId`], [`Label`] - Node handles and edge labels
//! - [`TransitionGraph`], [`GraphBuilder`] - Immutable node arena with two labeled edges per node
//! - [`InstructionTape`] - Cyclically repeated sequence of edge labels
//! - [`NodePattern`] - Name-based node selection (start and accepting nodes)
//! - [`MapDocument`], [`NodeDefinition`] - Parser for the textual map format
//! - [`LockstepError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod document;
mod error;
mod graph;
mod ids;
mod pattern;
mod tape;

pub use document::{MapDocument, NodeDefinition};
pub use error::{ArithmeticOverflowError, ConfigurationError, LockstepError, ParseError};
pub use graph::{GraphBuilder, TransitionGraph};
pub use ids::{Label, NodeId};
pub use pattern::NodePattern;
pub use tape::InstructionTape;
