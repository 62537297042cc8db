//! Periodic description of the steps at which a walker is accepting.
//!
//! A deterministic walk over a finite `(node, phase)` space is eventually
//! periodic: a finite tail followed by a repeating cycle. A
//! [`CycleDescriptor`] records which steps of the tail are accepting and
//! which offsets into the cycle are accepting, which is enough to answer
//! membership for any step in O(log n).

use lockstep_types::ArithmeticOverflowError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Error type for descriptor construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Cycle length must be at least 1.
    #[error("cycle length must be at least 1")]
    ZeroCycle,

    /// A tail step lies outside the tail.
    #[error("tail step {step} is not below tail length {tail_length}")]
    TailStepOutOfRange {
        /// The offending step.
        step: u64,
        /// The tail length.
        tail_length: u64,
    },

    /// A cycle offset lies outside the cycle.
    #[error("cycle offset {offset} is not below cycle length {cycle_length}")]
    OffsetOutOfRange {
        /// The offending offset.
        offset: u64,
        /// The cycle length.
        cycle_length: u64,
    },
}

/// The set of accepting steps of one walker (or of an intersection of
/// walkers), as a tail plus a repeating cycle.
///
/// Step `t < tail_length` is accepting iff `t` is in the tail set. Step
/// `t >= tail_length` is accepting iff `(t - tail_length) % cycle_length` is
/// in the offset set. Both sets may be empty.
///
/// Descriptors are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleDescriptor {
    tail_length: u64,
    cycle_length: u64,
    tail_accepting_steps: BTreeSet<u64>,
    cycle_accepting_offsets: BTreeSet<u64>,
}

impl CycleDescriptor {
    /// Create a descriptor, checking that every step and offset is in range.
    pub fn new(
        tail_length: u64,
        cycle_length: u64,
        tail_accepting_steps: BTreeSet<u64>,
        cycle_accepting_offsets: BTreeSet<u64>,
    ) -> Result<Self, DescriptorError> {
        if cycle_length == 0 {
            return Err(DescriptorError::ZeroCycle);
        }
        if let Some(&step) = tail_accepting_steps.last() {
            if step >= tail_length {
                return Err(DescriptorError::TailStepOutOfRange { step, tail_length });
            }
        }
        if let Some(&offset) = cycle_accepting_offsets.last() {
            if offset >= cycle_length {
                return Err(DescriptorError::OffsetOutOfRange {
                    offset,
                    cycle_length,
                });
            }
        }
        Ok(Self::from_parts(
            tail_length,
            cycle_length,
            tail_accepting_steps,
            cycle_accepting_offsets,
        ))
    }

    /// Construct from parts already known to satisfy the range invariants.
    pub(crate) fn from_parts(
        tail_length: u64,
        cycle_length: u64,
        tail_accepting_steps: BTreeSet<u64>,
        cycle_accepting_offsets: BTreeSet<u64>,
    ) -> Self {
        debug_assert!(cycle_length >= 1);
        debug_assert!(tail_accepting_steps.iter().all(|&s| s < tail_length));
        debug_assert!(cycle_accepting_offsets.iter().all(|&o| o < cycle_length));
        Self {
            tail_length,
            cycle_length,
            tail_accepting_steps,
            cycle_accepting_offsets,
        }
    }

    /// Every step is accepting. This is the identity of
    /// [`merge`](crate::merge::merge).
    pub fn always() -> Self {
        Self::from_parts(0, 1, BTreeSet::new(), BTreeSet::from([0]))
    }

    /// No step is accepting.
    pub fn never() -> Self {
        Self::from_parts(0, 1, BTreeSet::new(), BTreeSet::new())
    }

    /// Steps before the cycle begins.
    pub fn tail_length(&self) -> u64 {
        self.tail_length
    }

    /// Period of the repeating part.
    pub fn cycle_length(&self) -> u64 {
        self.cycle_length
    }

    /// Accepting steps inside the tail.
    pub fn tail_accepting_steps(&self) -> &BTreeSet<u64> {
        &self.tail_accepting_steps
    }

    /// Accepting offsets inside the cycle.
    pub fn cycle_accepting_offsets(&self) -> &BTreeSet<u64> {
        &self.cycle_accepting_offsets
    }

    /// Check if no step at all is accepting.
    pub fn is_never(&self) -> bool {
        self.tail_accepting_steps.is_empty() && self.cycle_accepting_offsets.is_empty()
    }

    /// Check if step `t` is accepting.
    pub fn is_accepted(&self, t: u64) -> bool {
        if t < self.tail_length {
            self.tail_accepting_steps.contains(&t)
        } else {
            self.cycle_accepting_offsets
                .contains(&((t - self.tail_length) % self.cycle_length))
        }
    }

    /// The smallest accepting step, or `None` if there is none.
    ///
    /// Fails only if the first cyclic hit lies beyond `u64::MAX`.
    pub fn earliest(&self) -> Result<Option<u64>, ArithmeticOverflowError> {
        if let Some(&step) = self.tail_accepting_steps.first() {
            return Ok(Some(step));
        }
        match self.cycle_accepting_offsets.first() {
            Some(&offset) => self
                .tail_length
                .checked_add(offset)
                .map(Some)
                .ok_or_else(|| ArithmeticOverflowError::new("add", self.tail_length, offset)),
            None => Ok(None),
        }
    }

    /// Iterate over accepting steps below `bound`, in increasing order.
    pub fn accepted_until(&self, bound: u64) -> impl Iterator<Item = u64> + '_ {
        let tail = self
            .tail_accepting_steps
            .range(..bound.min(self.tail_length))
            .copied();

        let cyclic = !self.cycle_accepting_offsets.is_empty();
        let bases = (0u64..).map_while(move |k| {
            if !cyclic {
                return None;
            }
            let base = k
                .checked_mul(self.cycle_length)?
                .checked_add(self.tail_length)?;
            (base < bound).then_some(base)
        });
        let periodic = bases.flat_map(move |base| {
            self.cycle_accepting_offsets
                .iter()
                .map_while(move |&offset| base.checked_add(offset).filter(|&t| t < bound))
        });

        tail.chain(periodic)
    }
}

impl Default for CycleDescriptor {
    fn default() -> Self {
        Self::never()
    }
}

impl fmt::Display for CycleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tail {} {:?}, cycle {} {:?}",
            self.tail_length,
            self.tail_accepting_steps,
            self.cycle_length,
            self.cycle_accepting_offsets
        )
    }
}
