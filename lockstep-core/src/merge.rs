//! Intersection of periodic step sets.
//!
//! [`merge`] computes a descriptor accepting exactly the steps both inputs
//! accept. It is a pure function, commutative and associative over the sets
//! it represents, with [`CycleDescriptor::always`] as identity and
//! [`CycleDescriptor::never`] as absorbing element. Any number of walkers can
//! therefore be folded in any order or as a parallel reduction tree.

use crate::arith::{checked_lcm, Congruence};
use crate::descriptor::CycleDescriptor;
use lockstep_types::ArithmeticOverflowError;
use std::collections::BTreeSet;

/// Intersect two descriptors.
///
/// The result has tail `max(a.tail, b.tail)` and cycle `lcm(a.cycle, b.cycle)`.
/// Tail hits are found by direct comparison inside the common tail; cycle
/// offsets come from solving one congruence pair per pair of input offsets.
///
/// When either side has no cycle offsets the intersection has no periodic
/// part, so the lcm is not needed: the result gets cycle length 1 and can
/// never overflow.
pub fn merge(
    a: &CycleDescriptor,
    b: &CycleDescriptor,
) -> Result<CycleDescriptor, ArithmeticOverflowError> {
    let tail_length = a.tail_length().max(b.tail_length());

    let tail_accepting_steps: BTreeSet<u64> = a
        .accepted_until(tail_length)
        .filter(|&t| b.is_accepted(t))
        .collect();

    if a.cycle_accepting_offsets().is_empty() || b.cycle_accepting_offsets().is_empty() {
        tracing::trace!(
            "merged tail {}/{} without periodic part -> tail {} ({} hits)",
            a.tail_length(),
            b.tail_length(),
            tail_length,
            tail_accepting_steps.len()
        );
        return Ok(CycleDescriptor::from_parts(
            tail_length,
            1,
            tail_accepting_steps,
            BTreeSet::new(),
        ));
    }

    let cycle_length = checked_lcm(a.cycle_length(), b.cycle_length())?;

    // Offsets are measured from the common tail, so shift each solution back
    // by tail_length modulo the new cycle.
    let shift = tail_length % cycle_length;
    let mut cycle_accepting_offsets = BTreeSet::new();
    for &oa in a.cycle_accepting_offsets() {
        let ca = Congruence::new(a.tail_length() as u128 + oa as u128, a.cycle_length());
        for &ob in b.cycle_accepting_offsets() {
            let cb = Congruence::new(b.tail_length() as u128 + ob as u128, b.cycle_length());
            if let Some(both) = ca.intersect(&cb)? {
                let offset = (both.residue() as u128 + cycle_length as u128 - shift as u128)
                    % cycle_length as u128;
                cycle_accepting_offsets.insert(offset as u64);
            }
        }
    }

    tracing::trace!(
        "merged tail {}/{} cycle {}/{} -> tail {} cycle {} ({} hits, {} offsets)",
        a.tail_length(),
        b.tail_length(),
        a.cycle_length(),
        b.cycle_length(),
        tail_length,
        cycle_length,
        tail_accepting_steps.len(),
        cycle_accepting_offsets.len()
    );

    Ok(CycleDescriptor::from_parts(
        tail_length,
        cycle_length,
        tail_accepting_steps,
        cycle_accepting_offsets,
    ))
}

/// Fold descriptors left to right.
///
/// Stops as soon as an input or the running intersection is empty; remaining
/// descriptors are not examined. An empty input folds to
/// [`CycleDescriptor::always`].
pub fn merge_all<'a, I>(descriptors: I) -> Result<CycleDescriptor, ArithmeticOverflowError>
where
    I: IntoIterator<Item = &'a CycleDescriptor>,
{
    let mut acc = CycleDescriptor::always();
    for (i, descriptor) in descriptors.into_iter().enumerate() {
        if descriptor.is_never() {
            tracing::debug!("walker {} is never accepting, stopping fold", i);
            return Ok(CycleDescriptor::never());
        }
        acc = merge(&acc, descriptor)?;
        if acc.is_never() {
            tracing::debug!("intersection empty after {} walkers, stopping fold", i + 1);
            return Ok(CycleDescriptor::never());
        }
    }
    Ok(acc)
}

/// Fold descriptors as a parallel pairwise reduction tree.
///
/// Produces the same set as [`merge_all`]. Subtrees that are already empty
/// absorb their sibling without merging.
#[cfg(feature = "parallel")]
pub fn merge_all_parallel(
    descriptors: &[CycleDescriptor],
) -> Result<CycleDescriptor, ArithmeticOverflowError> {
    use rayon::prelude::*;

    descriptors
        .par_iter()
        .cloned()
        .map(Ok)
        .try_reduce(CycleDescriptor::always, |a, b| {
            if a.is_never() || b.is_never() {
                return Ok(CycleDescriptor::never());
            }
            merge(&a, &b)
        })
}
