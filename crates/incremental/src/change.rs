//! Change event type for live query reconciliation.
//!
//! A ChangeEvent reports one mutation to a live query result together with
//! the document's position before and after the change.

use alloc::vec::Vec;
use ripple_core::{ChangeType, Document, DocumentId, Error, Result};

/// One reported mutation to a live query result.
///
/// Index fields use `None` as the "no position" sentinel:
/// - `Added`: `new_index` is set, `old_index` is `None`
/// - `Modified`: both are set (possibly equal)
/// - `Removed`: `old_index` is set, `new_index` is `None`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The kind of mutation
    pub change_type: ChangeType,
    /// Position before the change
    pub old_index: Option<usize>,
    /// Position after the change
    pub new_index: Option<usize>,
    /// The document as of this change
    pub document: Document,
}

impl ChangeEvent {
    /// Creates a change event from raw parts without checking the sentinels.
    #[inline]
    pub fn new(
        change_type: ChangeType,
        old_index: Option<usize>,
        new_index: Option<usize>,
        document: Document,
    ) -> Self {
        Self {
            change_type,
            old_index,
            new_index,
            document,
        }
    }

    /// Creates an `Added` event placing the document at `new_index`.
    #[inline]
    pub fn added(document: Document, new_index: usize) -> Self {
        Self::new(ChangeType::Added, None, Some(new_index), document)
    }

    /// Creates a `Modified` event moving the document from `old_index` to `new_index`.
    #[inline]
    pub fn modified(document: Document, old_index: usize, new_index: usize) -> Self {
        Self::new(ChangeType::Modified, Some(old_index), Some(new_index), document)
    }

    /// Creates a `Removed` event for the document at `old_index`.
    #[inline]
    pub fn removed(document: Document, old_index: usize) -> Self {
        Self::new(ChangeType::Removed, Some(old_index), None, document)
    }

    /// Returns the change type.
    #[inline]
    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// Returns the document.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the document identifier.
    #[inline]
    pub fn id(&self) -> &DocumentId {
        self.document.id()
    }

    /// Returns true if this is an `Added` event.
    #[inline]
    pub fn is_added(&self) -> bool {
        self.change_type == ChangeType::Added
    }

    /// Returns true if this is a `Modified` event.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.change_type == ChangeType::Modified
    }

    /// Returns true if this is a `Removed` event.
    #[inline]
    pub fn is_removed(&self) -> bool {
        self.change_type == ChangeType::Removed
    }

    /// Returns true if a `Modified` event changes the document's position.
    #[inline]
    pub fn is_move(&self) -> bool {
        self.is_modified() && self.old_index != self.new_index
    }

    /// Checks that the index sentinels match the change type.
    pub fn check_sentinels(&self) -> Result<()> {
        let ty = self.change_type;
        match (ty.has_old_index(), self.old_index.is_some()) {
            (true, false) => return Err(Error::malformed_event(ty, "missing old_index")),
            (false, true) => return Err(Error::malformed_event(ty, "old_index must be none")),
            _ => {}
        }
        match (ty.has_new_index(), self.new_index.is_some()) {
            (true, false) => Err(Error::malformed_event(ty, "missing new_index")),
            (false, true) => Err(Error::malformed_event(ty, "new_index must be none")),
            _ => Ok(()),
        }
    }

    /// Returns the document, consuming the event.
    #[inline]
    pub fn into_document(self) -> Document {
        self.document
    }
}

/// A batch of change events delivered by one source notification.
pub type ChangeBatch = Vec<ChangeEvent>;

/// Extension trait for working with change batches.
pub trait ChangeBatchExt {
    /// Returns the number of events of the given type.
    fn count_of(&self, change_type: ChangeType) -> usize;

    /// Returns the net effect on the result set length (added - removed).
    fn net_count(&self) -> i64;
}

impl ChangeBatchExt for [ChangeEvent] {
    fn count_of(&self, change_type: ChangeType) -> usize {
        self.iter().filter(|e| e.change_type == change_type).count()
    }

    fn net_count(&self) -> i64 {
        self.iter().map(|e| e.change_type.weight()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn doc(id: &str) -> Document {
        Document::empty(id)
    }

    #[test]
    fn test_change_event_added() {
        let e = ChangeEvent::added(doc("a"), 3);
        assert!(e.is_added());
        assert_eq!(e.old_index, None);
        assert_eq!(e.new_index, Some(3));
        assert_eq!(e.id().as_str(), "a");
        assert!(e.check_sentinels().is_ok());
    }

    #[test]
    fn test_change_event_modified() {
        let e = ChangeEvent::modified(doc("a"), 1, 1);
        assert!(e.is_modified());
        assert!(!e.is_move());
        assert!(ChangeEvent::modified(doc("a"), 1, 0).is_move());
        assert!(e.check_sentinels().is_ok());
    }

    #[test]
    fn test_change_event_removed() {
        let e = ChangeEvent::removed(doc("a"), 0);
        assert!(e.is_removed());
        assert_eq!(e.old_index, Some(0));
        assert_eq!(e.new_index, None);
        assert!(e.check_sentinels().is_ok());
    }

    #[test]
    fn test_change_event_bad_sentinels() {
        let e = ChangeEvent::new(ChangeType::Added, Some(0), Some(0), doc("a"));
        assert!(matches!(e.check_sentinels(), Err(Error::MalformedEvent { .. })));

        let e = ChangeEvent::new(ChangeType::Removed, None, None, doc("a"));
        assert!(matches!(e.check_sentinels(), Err(Error::MalformedEvent { .. })));

        let e = ChangeEvent::new(ChangeType::Modified, Some(0), None, doc("a"));
        assert!(matches!(e.check_sentinels(), Err(Error::MalformedEvent { .. })));
    }

    #[test]
    fn test_change_batch_counts() {
        let batch: ChangeBatch = vec![
            ChangeEvent::added(doc("a"), 0),
            ChangeEvent::added(doc("b"), 1),
            ChangeEvent::modified(doc("a"), 0, 1),
            ChangeEvent::removed(doc("b"), 0),
        ];
        assert_eq!(batch.count_of(ChangeType::Added), 2);
        assert_eq!(batch.count_of(ChangeType::Modified), 1);
        assert_eq!(batch.count_of(ChangeType::Removed), 1);
        assert_eq!(batch.net_count(), 1);
    }
}
