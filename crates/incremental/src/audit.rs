//! Append-only audit log of observed changes.
//!
//! Unlike [`ReconciledSet`](crate::ReconciledSet), the log does not interpret
//! positions or drop duplicates: every filtered event is recorded in arrival
//! order. The log grows for as long as the subscription lives.

use crate::change::ChangeEvent;
use crate::fold::{ApplyStats, BatchFold};
use alloc::vec::Vec;
use ripple_core::{ChangeType, Result};

/// Every change event observed by a subscription, in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditLog {
    entries: Vec<ChangeEvent>,
}

impl AuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[inline]
    pub fn entries(&self) -> &[ChangeEvent] {
        &self.entries
    }

    /// Returns the number of recorded events.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the recorded events.
    pub fn iter(&self) -> core::slice::Iter<'_, ChangeEvent> {
        self.entries.iter()
    }

    /// Returns the number of recorded events of the given type.
    pub fn count_of(&self, change_type: ChangeType) -> usize {
        self.entries.iter().filter(|e| e.change_type == change_type).count()
    }

    /// Appends every event of `batch`, returning the grown log.
    pub fn accumulate(mut self, batch: &[ChangeEvent]) -> Self {
        self.extend(batch);
        self
    }

    /// Appends every event of `batch` in place.
    pub fn extend(&mut self, batch: &[ChangeEvent]) {
        self.entries.extend_from_slice(batch);
    }

    /// Consumes the log and returns its entries.
    pub fn into_entries(self) -> Vec<ChangeEvent> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a AuditLog {
    type Item = &'a ChangeEvent;
    type IntoIter = core::slice::Iter<'a, ChangeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Appends `batch` to `log`.
///
/// See [`AuditLog::accumulate`].
pub fn accumulate(log: AuditLog, batch: &[ChangeEvent]) -> AuditLog {
    log.accumulate(batch)
}

impl BatchFold for AuditLog {
    type Output = AuditLog;

    fn fold_batch(&mut self, batch: &[ChangeEvent]) -> Result<ApplyStats> {
        self.extend(batch);
        Ok(ApplyStats {
            applied: batch.len(),
            ..ApplyStats::default()
        })
    }

    fn output(&self) -> &AuditLog {
        self
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use ripple_core::Document;

    fn doc(id: &str) -> Document {
        Document::empty(id)
    }

    #[test]
    fn test_audit_log_new() {
        let log = AuditLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn test_accumulate_appends_in_order() {
        let log = accumulate(AuditLog::new(), &[ChangeEvent::added(doc("a"), 0)]);
        let log = accumulate(
            log,
            &[ChangeEvent::added(doc("b"), 0), ChangeEvent::removed(doc("a"), 1)],
        );

        let ids: Vec<&str> = log.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "a"]);
        assert_eq!(log.count_of(ChangeType::Added), 2);
        assert_eq!(log.count_of(ChangeType::Removed), 1);
    }

    #[test]
    fn test_accumulate_keeps_duplicates() {
        let dup = ChangeEvent::added(doc("a"), 0);
        let log = AuditLog::new().accumulate(&[dup.clone(), dup.clone()]);
        assert_eq!(log.into_entries(), vec![dup.clone(), dup]);
    }

    #[test]
    fn test_accumulate_empty_batch() {
        let log = AuditLog::new().accumulate(&[ChangeEvent::added(doc("a"), 0)]);
        let same = log.clone().accumulate(&[]);
        assert_eq!(same, log);
    }

    #[test]
    fn test_audit_fold() {
        let mut log = AuditLog::new();
        let stats = log
            .fold_batch(&[ChangeEvent::added(doc("a"), 0), ChangeEvent::added(doc("a"), 0)])
            .unwrap();
        assert_eq!(stats.applied, 2);
        assert_eq!(BatchFold::len(&log), 2);
        assert_eq!(log.output().len(), 2);
    }
}
