//! Multi-walker synchronization.
//!
//! The solver analyses every walker into a [`CycleDescriptor`], folds the
//! descriptors into their intersection, and reads off the smallest step at
//! which every walker is accepting.
//!
//! A missing answer is a normal result ([`Outcome::NoSolution`]), not an
//! error: errors are reserved for malformed input and arithmetic overflow.

use crate::analyzer::{analyze_with, Detector};
use crate::descriptor::CycleDescriptor;
use crate::merge::merge_all;
use lockstep_types::{
    ArithmeticOverflowError, ConfigurationError, InstructionTape, LockstepError, NodeId,
    TransitionGraph,
};
use serde::Serialize;
use std::fmt;

/// Result of a synchronization query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every walker is accepting at this step, and at no earlier one.
    Synchronized(u64),
    /// No step exists at which every walker is accepting.
    NoSolution,
}

impl Outcome {
    /// The synchronized step, if any.
    pub fn step(&self) -> Option<u64> {
        match self {
            Outcome::Synchronized(step) => Some(*step),
            Outcome::NoSolution => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Synchronized(step) => write!(f, "{}", step),
            Outcome::NoSolution => write!(f, "no synchronized step exists"),
        }
    }
}

/// Read the earliest accepting step off a folded descriptor.
pub fn extract(folded: &CycleDescriptor) -> Result<Outcome, ArithmeticOverflowError> {
    Ok(match folded.earliest()? {
        Some(step) => Outcome::Synchronized(step),
        None => Outcome::NoSolution,
    })
}

/// Intersect already-analysed walkers and extract the earliest common step.
///
/// Any walker that is never accepting makes the answer
/// [`Outcome::NoSolution`] before any merging is attempted.
pub fn synchronize(
    descriptors: &[CycleDescriptor],
    parallel: bool,
) -> Result<Outcome, ArithmeticOverflowError> {
    if let Some(i) = descriptors.iter().position(CycleDescriptor::is_never) {
        tracing::debug!("walker {} is never accepting", i);
        return Ok(Outcome::NoSolution);
    }

    let folded = if parallel {
        fold_parallel(descriptors)?
    } else {
        merge_all(descriptors)?
    };
    extract(&folded)
}

#[cfg(feature = "parallel")]
fn fold_parallel(descriptors: &[CycleDescriptor]) -> Result<CycleDescriptor, ArithmeticOverflowError> {
    crate::merge::merge_all_parallel(descriptors)
}

#[cfg(not(feature = "parallel"))]
fn fold_parallel(descriptors: &[CycleDescriptor]) -> Result<CycleDescriptor, ArithmeticOverflowError> {
    merge_all(descriptors)
}

/// Solves synchronization queries against one graph and tape.
///
/// The graph and tape are borrowed read-only, so walker analyses can run
/// concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Solver<'g> {
    graph: &'g TransitionGraph,
    tape: &'g InstructionTape,
    detector: Detector,
    parallel: bool,
}

impl<'g> Solver<'g> {
    /// Create a solver with the default detector.
    ///
    /// Parallel mode is on when the `parallel` feature is compiled in.
    pub fn new(graph: &'g TransitionGraph, tape: &'g InstructionTape) -> Self {
        Self {
            graph,
            tape,
            detector: Detector::default(),
            parallel: cfg!(feature = "parallel"),
        }
    }

    /// Use a specific cycle detector.
    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detector = detector;
        self
    }

    /// Enable or disable parallel analysis and reduction.
    ///
    /// Without the `parallel` feature this only selects the sequential path.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Analyse each walker, in start order.
    pub fn describe(&self, starts: &[NodeId]) -> Result<Vec<CycleDescriptor>, ConfigurationError> {
        if starts.is_empty() {
            return Err(ConfigurationError::NoWalkers);
        }
        if self.parallel {
            self.describe_parallel(starts)
        } else {
            starts
                .iter()
                .map(|&start| analyze_with(self.graph, self.tape, start, self.detector))
                .collect()
        }
    }

    #[cfg(feature = "parallel")]
    fn describe_parallel(&self, starts: &[NodeId]) -> Result<Vec<CycleDescriptor>, ConfigurationError> {
        use rayon::prelude::*;

        starts
            .par_iter()
            .map(|&start| analyze_with(self.graph, self.tape, start, self.detector))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn describe_parallel(&self, starts: &[NodeId]) -> Result<Vec<CycleDescriptor>, ConfigurationError> {
        starts
            .iter()
            .map(|&start| analyze_with(self.graph, self.tape, start, self.detector))
            .collect()
    }

    /// Find the first step at which every walker is accepting.
    pub fn solve(&self, starts: &[NodeId]) -> Result<Outcome, LockstepError> {
        let descriptors = self.describe(starts)?;
        let outcome = synchronize(&descriptors, self.parallel)?;
        tracing::info!("{} walkers: {}", starts.len(), outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_types::{MapDocument, NodePattern};

    fn load(text: &str, accept: NodePattern) -> (TransitionGraph, InstructionTape) {
        let doc = MapDocument::parse(text).unwrap();
        let graph = doc.graph(&accept).unwrap();
        (graph, doc.tape().clone())
    }

    const TWO_GHOSTS: &str = "LR

11A = (11B, XXX)
11B = (XXX, 11Z)
11Z = (11B, XXX)
22A = (22B, XXX)
22B = (22C, 22C)
22C = (22Z, 22Z)
22Z = (22B, 22B)
XXX = (XXX, XXX)
";

    const SINGLE_WALKER: &str = "LLR

AAA = (BBB, BBB)
BBB = (AAA, ZZZ)
ZZZ = (ZZZ, ZZZ)
";

    #[test]
    fn two_ghosts_meet_at_six() {
        let (graph, tape) = load(TWO_GHOSTS, NodePattern::Suffix("Z".into()));
        let starts = graph.select(&NodePattern::Suffix("A".into()));
        assert_eq!(starts.len(), 2);

        for parallel in [false, true] {
            for detector in [Detector::HashMap, Detector::Floyd] {
                let outcome = Solver::new(&graph, &tape)
                    .with_detector(detector)
                    .with_parallel(parallel)
                    .solve(&starts)
                    .unwrap();
                assert_eq!(outcome, Outcome::Synchronized(6));
            }
        }
    }

    #[test]
    fn single_walker_reaches_target_in_six() {
        let (graph, tape) = load(SINGLE_WALKER, NodePattern::Name("ZZZ".into()));
        let start = graph.lookup("AAA").unwrap();
        let outcome = Solver::new(&graph, &tape).solve(&[start]).unwrap();
        assert_eq!(outcome, Outcome::Synchronized(6));
    }

    #[test]
    fn tail_only_walker_synchronizes_inside_tail() {
        let text = "L

SSA = (HHZ, HHZ)
HHZ = (DDD, DDD)
DDD = (DDD, DDD)
TTA = (UUZ, UUZ)
UUZ = (TTA, TTA)
";
        let (graph, tape) = load(text, NodePattern::Suffix("Z".into()));
        let starts = graph.select(&NodePattern::Suffix("A".into()));
        let outcome = Solver::new(&graph, &tape).solve(&starts).unwrap();
        assert_eq!(outcome, Outcome::Synchronized(1));
    }

    #[test]
    fn tail_only_walker_that_misses_gives_no_solution() {
        // TTA is accepting on even steps only; SSA only at step 1.
        let text = "L

SSA = (HHZ, HHZ)
HHZ = (DDD, DDD)
DDD = (DDD, DDD)
TTA = (UUB, UUB)
UUB = (TTZ, TTZ)
TTZ = (UUB, UUB)
";
        let (graph, tape) = load(text, NodePattern::Suffix("Z".into()));
        let starts = graph.select(&NodePattern::Suffix("A".into()));
        let outcome = Solver::new(&graph, &tape).solve(&starts).unwrap();
        assert_eq!(outcome, Outcome::NoSolution);
    }

    #[test]
    fn never_accepting_walker_gives_no_solution() {
        let (graph, tape) = load(TWO_GHOSTS, NodePattern::Suffix("Z".into()));
        let starts = vec![
            graph.lookup("11A").unwrap(),
            graph.lookup("XXX").unwrap(),
            graph.lookup("22A").unwrap(),
        ];
        let outcome = Solver::new(&graph, &tape).solve(&starts).unwrap();
        assert_eq!(outcome, Outcome::NoSolution);
        assert_eq!(outcome.step(), None);
    }

    #[test]
    fn no_walkers_is_a_configuration_error() {
        let (graph, tape) = load(TWO_GHOSTS, NodePattern::Suffix("Z".into()));
        let err = Solver::new(&graph, &tape).solve(&[]).unwrap_err();
        assert_eq!(err, LockstepError::Configuration(ConfigurationError::NoWalkers));
    }

    #[test]
    fn configuration_errors_abort_the_whole_solve() {
        let (graph, tape) = load(TWO_GHOSTS, NodePattern::Suffix("Z".into()));
        let starts = vec![graph.lookup("11A").unwrap(), NodeId::new(42)];
        let err = Solver::new(&graph, &tape)
            .with_parallel(false)
            .solve(&starts)
            .unwrap_err();
        assert!(matches!(
            err,
            LockstepError::Configuration(ConfigurationError::UnknownNode(_))
        ));
    }

    #[test]
    fn describe_returns_one_descriptor_per_walker_in_order() {
        let (graph, tape) = load(TWO_GHOSTS, NodePattern::Suffix("Z".into()));
        let starts = graph.select(&NodePattern::Suffix("A".into()));
        let descriptors = Solver::new(&graph, &tape).describe(&starts).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].cycle_length(), 2);
        assert_eq!(descriptors[1].cycle_length(), 6);
    }

    #[test]
    fn synchronize_reports_overflow() {
        let a = CycleDescriptor::new(0, (1 << 61) - 1, Default::default(), [0].into()).unwrap();
        let b = CycleDescriptor::new(0, (1 << 31) - 1, Default::default(), [0].into()).unwrap();
        for parallel in [false, true] {
            let err = synchronize(&[a.clone(), b.clone()], parallel).unwrap_err();
            assert_eq!(err.operation, "lcm");
        }
    }

    #[test]
    fn synchronize_prefers_no_solution_over_overflow() {
        let a = CycleDescriptor::new(0, (1 << 61) - 1, Default::default(), [0].into()).unwrap();
        let b = CycleDescriptor::new(0, (1 << 31) - 1, Default::default(), [0].into()).unwrap();
        let outcome = synchronize(&[a, b, CycleDescriptor::never()], false).unwrap();
        assert_eq!(outcome, Outcome::NoSolution);
    }

    #[test]
    fn synchronize_tail_only_walker_with_huge_cycle() {
        let tail_only =
            CycleDescriptor::new(3, (1 << 61) - 1, [1].into(), Default::default()).unwrap();
        let periodic =
            CycleDescriptor::new(0, (1 << 31) - 1, Default::default(), [1].into()).unwrap();
        for parallel in [false, true] {
            let outcome = synchronize(&[tail_only.clone(), periodic.clone()], parallel).unwrap();
            assert_eq!(outcome, Outcome::Synchronized(1));
        }
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::Synchronized(6).to_string(), "6");
        assert_eq!(Outcome::NoSolution.to_string(), "no synchronized step exists");
    }
}
