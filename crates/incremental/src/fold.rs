//! Batch folds.
//!
//! A fold owns a piece of state and advances it by one change batch at a
//! time. Every fold in this crate is also exposed as a pure
//! `(state, batch) -> state` function; this trait is the stateful face the
//! stream pipelines drive.

use crate::change::ChangeEvent;
use ripple_core::Result;

/// Counters describing what a fold did with one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Events that changed the state
    pub applied: usize,
    /// `Added` events skipped as duplicates
    pub skipped_duplicates: usize,
    /// Events dropped because an index they need was missing
    pub ignored: usize,
}

impl ApplyStats {
    /// Returns the total number of events seen.
    #[inline]
    pub fn total(&self) -> usize {
        self.applied + self.skipped_duplicates + self.ignored
    }

    /// Adds another batch's counters to this one.
    #[inline]
    pub fn merge(&mut self, other: ApplyStats) {
        self.applied += other.applied;
        self.skipped_duplicates += other.skipped_duplicates;
        self.ignored += other.ignored;
    }
}

/// A stateful reducer over change batches.
pub trait BatchFold {
    /// The value emitted after each batch.
    type Output: Clone;

    /// Applies one batch to the state.
    ///
    /// An error leaves the fold in an unspecified state; callers stop feeding
    /// it afterwards.
    fn fold_batch(&mut self, batch: &[ChangeEvent]) -> Result<ApplyStats>;

    /// Returns the current state.
    fn output(&self) -> &Self::Output;

    /// Returns the number of entries in the current state.
    fn len(&self) -> usize;

    /// Returns true if the state holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
