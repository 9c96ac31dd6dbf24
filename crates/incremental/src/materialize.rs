//! Reconciled result set for live queries.
//!
//! `ReconciledSet` is the ordered, de-duplicated current result of a live
//! query. It is advanced by applying change batches whose indices refer to the
//! positions the source reported, in the order the source reported them.
//!
//! Within a batch, every event's indices are relative to the set as it stands
//! after all earlier events of the same batch. Events are therefore applied
//! one at a time, strictly in batch order.

use crate::change::ChangeEvent;
use crate::fold::{ApplyStats, BatchFold};
use alloc::vec::Vec;
use hashbrown::HashSet;
use ripple_core::{ChangeType, Document, DocumentId, Error, Result};

/// How event indices are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Indices are taken as supplied. An out-of-range index panics.
    #[default]
    Trust,
    /// Indices and sentinels are checked before each event is applied, and
    /// identifiers are checked for uniqueness after each batch.
    Validate,
}

/// How duplicate `Added` events are detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Skip an add whose document already occupies `new_index`.
    #[default]
    AtIndex,
    /// Skip an add whose document is present anywhere in the set.
    Anywhere,
}

/// Reconciliation settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileConfig {
    pub index_policy: IndexPolicy,
    pub duplicates: DuplicatePolicy,
}

impl ReconcileConfig {
    /// Creates the default configuration: trusted indices, duplicate check at
    /// the insertion index only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that validates every event.
    pub fn validated() -> Self {
        Self::default().index_policy(IndexPolicy::Validate)
    }

    /// Sets the index policy.
    pub fn index_policy(mut self, policy: IndexPolicy) -> Self {
        self.index_policy = policy;
        self
    }

    /// Sets the duplicate detection policy.
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}

enum Step {
    Applied,
    Duplicate,
    Ignored,
}

/// The ordered current result of a live query.
///
/// Each entry is the latest change event seen for a live document; its
/// position in the set is the document's rank in the query's sort order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconciledSet {
    entries: Vec<ChangeEvent>,
}

impl ReconciledSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from entries already in sort order.
    pub fn from_entries(entries: Vec<ChangeEvent>) -> Self {
        Self { entries }
    }

    /// Returns the entries in sort order.
    #[inline]
    pub fn entries(&self) -> &[ChangeEvent] {
        &self.entries
    }

    /// Returns the number of live documents.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ChangeEvent> {
        self.entries.get(index)
    }

    /// Iterates over the entries in sort order.
    pub fn iter(&self) -> core::slice::Iter<'_, ChangeEvent> {
        self.entries.iter()
    }

    /// Returns the document identifiers in sort order.
    pub fn ids(&self) -> Vec<&DocumentId> {
        self.entries.iter().map(|e| e.id()).collect()
    }

    /// Returns the position of the document with the given identifier.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id().as_str() == id)
    }

    /// Returns true if the document with the given identifier is present.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    /// Returns the documents in sort order.
    pub fn documents(&self) -> Vec<Document> {
        self.entries.iter().map(|e| e.document.clone()).collect()
    }

    /// Consumes the set and returns the documents in sort order.
    pub fn into_documents(self) -> Vec<Document> {
        self.entries.into_iter().map(ChangeEvent::into_document).collect()
    }

    /// Consumes the set and returns its entries.
    pub fn into_entries(self) -> Vec<ChangeEvent> {
        self.entries
    }

    /// Returns the first identifier that appears more than once, if any.
    pub fn first_duplicate(&self) -> Option<&DocumentId> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries.iter().map(|e| e.id()).find(|id| !seen.insert(id.as_str()))
    }

    /// Applies a batch with trusted indices, returning the new set.
    ///
    /// # Panics
    ///
    /// Indices are a precondition supplied by the change source. An index
    /// outside the current set panics; use [`ReconciledSet::try_apply_batch`]
    /// with [`IndexPolicy::Validate`] to get an error instead.
    pub fn apply_batch(mut self, batch: &[ChangeEvent]) -> Self {
        for event in batch {
            self.apply_event(event, DuplicatePolicy::AtIndex);
        }
        self
    }

    /// Applies a batch under `config`, returning the new set.
    pub fn try_apply_batch(mut self, batch: &[ChangeEvent], config: &ReconcileConfig) -> Result<Self> {
        self.apply(batch, config)?;
        Ok(self)
    }

    /// Applies a batch in place under `config`.
    ///
    /// With [`IndexPolicy::Trust`] this never returns an error.
    pub fn apply(&mut self, batch: &[ChangeEvent], config: &ReconcileConfig) -> Result<ApplyStats> {
        let mut stats = ApplyStats::default();
        for event in batch {
            if config.index_policy == IndexPolicy::Validate {
                self.validate_event(event)?;
            }
            match self.apply_event(event, config.duplicates) {
                Step::Applied => stats.applied += 1,
                Step::Duplicate => stats.skipped_duplicates += 1,
                Step::Ignored => stats.ignored += 1,
            }
        }
        if config.index_policy == IndexPolicy::Validate {
            if let Some(id) = self.first_duplicate() {
                return Err(Error::duplicate_document(id.as_str()));
            }
        }
        Ok(stats)
    }

    fn apply_event(&mut self, event: &ChangeEvent, duplicates: DuplicatePolicy) -> Step {
        match event.change_type {
            ChangeType::Added => {
                let Some(at) = event.new_index else {
                    return Step::Ignored;
                };
                if self.is_duplicate(event, at, duplicates) {
                    return Step::Duplicate;
                }
                self.entries.insert(at, event.clone());
            }
            ChangeType::Modified => {
                let (Some(from), Some(to)) = (event.old_index, event.new_index) else {
                    return Step::Ignored;
                };
                if from == to {
                    self.entries[from] = event.clone();
                } else {
                    // `to` refers to the set after the removal.
                    self.entries.remove(from);
                    self.entries.insert(to, event.clone());
                }
            }
            ChangeType::Removed => {
                let Some(from) = event.old_index else {
                    return Step::Ignored;
                };
                self.entries.remove(from);
            }
        }
        Step::Applied
    }

    fn is_duplicate(&self, event: &ChangeEvent, at: usize, duplicates: DuplicatePolicy) -> bool {
        match duplicates {
            DuplicatePolicy::AtIndex => self.entries.get(at).is_some_and(|e| e.id() == event.id()),
            DuplicatePolicy::Anywhere => self.contains(event.id().as_str()),
        }
    }

    fn validate_event(&self, event: &ChangeEvent) -> Result<()> {
        event.check_sentinels()?;
        let len = self.entries.len();
        let ty = event.change_type;
        match (ty, event.old_index, event.new_index) {
            (ChangeType::Added, _, Some(at)) if at > len => Err(Error::index_out_of_range(ty, at, len)),
            (ChangeType::Modified, Some(from), _) if from >= len => {
                Err(Error::index_out_of_range(ty, from, len))
            }
            (ChangeType::Modified, _, Some(to)) if to >= len => Err(Error::index_out_of_range(ty, to, len)),
            (ChangeType::Removed, Some(from), _) if from >= len => {
                Err(Error::index_out_of_range(ty, from, len))
            }
            _ => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a ReconciledSet {
    type Item = &'a ChangeEvent;
    type IntoIter = core::slice::Iter<'a, ChangeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Applies a batch to `current` with trusted indices.
///
/// See [`ReconciledSet::apply_batch`].
pub fn apply_batch(current: ReconciledSet, batch: &[ChangeEvent]) -> ReconciledSet {
    current.apply_batch(batch)
}

/// A [`ReconciledSet`] paired with the settings used to advance it.
#[derive(Clone, Debug, Default)]
pub struct ReconcileFold {
    set: ReconciledSet,
    config: ReconcileConfig,
}

impl ReconcileFold {
    /// Creates a fold over an empty set.
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            set: ReconciledSet::new(),
            config,
        }
    }

    /// Creates a fold starting from an existing set.
    pub fn with_initial(set: ReconciledSet, config: ReconcileConfig) -> Self {
        Self { set, config }
    }

    /// Returns the settings.
    #[inline]
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Consumes the fold and returns the set.
    pub fn into_set(self) -> ReconciledSet {
        self.set
    }
}

impl BatchFold for ReconcileFold {
    type Output = ReconciledSet;

    fn fold_batch(&mut self, batch: &[ChangeEvent]) -> Result<ApplyStats> {
        self.set.apply(batch, &self.config)
    }

    fn output(&self) -> &ReconciledSet {
        &self.set
    }

    fn len(&self) -> usize {
        self.set.len()
    }
}
