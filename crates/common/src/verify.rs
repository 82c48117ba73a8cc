//! Sort-order verification
//!
//! Decides whether a [`ProductSequence`] satisfies a [`SortMode`], whether
//! switching modes visibly reordered the listing, and whether a listing
//! survived a reload unchanged. Every failure names the first offending
//! position so a report can show the literal values involved.

use thiserror::Error;

use crate::types::{ProductRecord, ProductSequence, SortMode};

/// A listing that does not hold one of the ordering invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerifyError {
    #[error(
        "listing not ordered for {mode}: item {index} {left} precedes item {} {right}",
        .index + 1
    )]
    OutOfOrder {
        mode: SortMode,
        index: usize,
        left: ProductRecord,
        right: ProductRecord,
    },

    #[error("selecting {to} after {from} did not reorder the {len} listed items")]
    Unchanged {
        from: SortMode,
        to: SortMode,
        len: usize,
    },

    #[error(
        "listing under {mode} changed across reload at item {index}: before {}, after {}",
        describe(.before),
        describe(.after)
    )]
    NotPersisted {
        mode: SortMode,
        index: usize,
        before: Option<ProductRecord>,
        after: Option<ProductRecord>,
    },
}

fn describe(record: &Option<ProductRecord>) -> String {
    record
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "<none>".to_string())
}

/// Index of the first adjacent pair `(i, i + 1)` that `mode` does not allow
pub fn first_violation(sequence: &ProductSequence, mode: SortMode) -> Option<usize> {
    sequence
        .records()
        .windows(2)
        .position(|pair| !mode.allows(&pair[0], &pair[1]))
}

/// Whether every adjacent pair of `sequence` satisfies `mode`.
///
/// Empty and single-item listings are vacuously ordered.
pub fn is_ordered(sequence: &ProductSequence, mode: SortMode) -> bool {
    first_violation(sequence, mode).is_none()
}

/// Check `sequence` against `mode`, reporting the first violating pair
pub fn verify_order(sequence: &ProductSequence, mode: SortMode) -> Result<(), VerifyError> {
    match first_violation(sequence, mode) {
        None => Ok(()),
        Some(index) => Err(VerifyError::OutOfOrder {
            mode,
            index,
            left: sequence.records()[index].clone(),
            right: sequence.records()[index + 1].clone(),
        }),
    }
}

/// Check that switching from `from` to `to` produced a different listing.
///
/// With 0 or 1 items every order satisfies every mode, so nothing can change
/// and the check passes.
pub fn verify_reordered(
    previous: &ProductSequence,
    from: SortMode,
    current: &ProductSequence,
    to: SortMode,
) -> Result<(), VerifyError> {
    if current.len() <= 1 || previous != current {
        return Ok(());
    }

    Err(VerifyError::Unchanged {
        from,
        to,
        len: current.len(),
    })
}

/// Check that the listing captured before a reload matches the one after
pub fn verify_persisted(
    mode: SortMode,
    before: &ProductSequence,
    after: &ProductSequence,
) -> Result<(), VerifyError> {
    if before == after {
        return Ok(());
    }

    let index = before
        .iter()
        .zip(after.iter())
        .position(|(b, a)| b != a)
        .unwrap_or_else(|| before.len().min(after.len()));

    Err(VerifyError::NotPersisted {
        mode,
        index,
        before: before.get(index).cloned(),
        after: after.get(index).cloned(),
    })
}
