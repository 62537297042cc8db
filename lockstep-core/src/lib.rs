//! # lockstep-core
//!
//! Pure logic for lockstep (no I/O, instant tests).
//!
//! Given a [`TransitionGraph`](lockstep_types::TransitionGraph), a cyclic
//! [`InstructionTape`](lockstep_types::InstructionTape) and a set of start
//! nodes, find the first step at which every walker stands on an accepting
//! node at the same time.
//!
//! ## Pipeline
//!
//! 1. [`analyzer`] walks each start node until its `(node, phase)` state
//!    repeats and summarises the accepting steps as a [`CycleDescriptor`].
//! 2. [`merge`] intersects descriptors with a generalized Chinese-Remainder
//!    solve, producing another descriptor.
//! 3. [`solver`] folds all walkers and extracts the earliest common step.
//!
//! Descriptors are immutable and merging is associative and commutative, so
//! analysis and folding can run in parallel (the `parallel` feature, on by
//! default) without changing the result.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod arith;
pub mod descriptor;
pub mod merge;
pub mod solver;


pub use analyzer::{analyze, analyze_with, Detector};
pub use descriptor::{CycleDescriptor, DescriptorError};
pub use merge::{merge, merge_all};
#[cfg(feature = "parallel")]
pub use merge::merge_all_parallel;
pub use solver::{extract, synchronize, Outcome, Solver};
