//! Error types for lockstep.

use crate::ids::Label;
use thiserror::Error;

/// The graph, tape or walker set cannot be analysed.
///
/// Detected before any walker is simulated; no partial results exist when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The instruction tape has no labels
    #[error("instruction tape is empty")]
    EmptyTape,

    /// A node lacks one of its two labeled transitions
    #[error("node {node} has no {label} transition")]
    MissingTransition {
        /// Name of the incomplete node.
        node: String,
        /// The label whose target is missing.
        label: Label,
    },

    /// A start node does not belong to the graph
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// A node name was defined more than once
    #[error("node {0} is defined more than once")]
    DuplicateNode(String),

    /// No start nodes were supplied
    #[error("no walkers to synchronize")]
    NoWalkers,
}

/// A modular-arithmetic result does not fit in 64 bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("arithmetic overflow: {operation}({lhs}, {rhs}) exceeds u64")]
pub struct ArithmeticOverflowError {
    /// The operation that overflowed (`lcm`, `add`, ...).
    pub operation: &'static str,
    /// Left operand.
    pub lhs: u64,
    /// Right operand.
    pub rhs: u64,
}

impl ArithmeticOverflowError {
    /// Record an overflow of `operation` applied to `lhs` and `rhs`.
    pub fn new(operation: &'static str, lhs: u64, rhs: u64) -> Self {
        Self {
            operation,
            lhs,
            rhs,
        }
    }
}

/// The map document is not in the expected textual format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first line holds no instructions
    #[error("missing instruction line")]
    MissingInstructions,

    /// An instruction character is neither `L` nor `R`
    #[error("invalid instruction {found:?} at column {column}")]
    InvalidLabel {
        /// 1-based column on the instruction line.
        column: usize,
        /// The offending character.
        found: char,
    },

    /// A node line does not read `NAME = (LEFT, RIGHT)`
    #[error("malformed node definition on line {line}: {text:?}")]
    MalformedNode {
        /// 1-based line number.
        line: usize,
        /// The line as written.
        text: String,
    },
}

/// Errors that can occur in lockstep operations.
///
/// "No synchronized step exists" is not an error; it is reported as a
/// successful outcome by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockstepError {
    /// Malformed graph, tape or walker set
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A cycle length or step count exceeded 64 bits
    #[error(transparent)]
    ArithmeticOverflow(#[from] ArithmeticOverflowError),

    /// The map document could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}
