//! Change source seam.
//!
//! A [`LiveQuery`] is the external collaborator that owns the live-query
//! subscription, the connection and authentication. Ripple only consumes the
//! stream of [`QuerySnapshot`]s it produces.

use futures::stream::BoxStream;
use ripple_core::{Document, Payload, Result};
use ripple_incremental::{ChangeBatch, ChangeEvent, Project};
use std::sync::Arc;

/// Stream of snapshots for one subscription.
///
/// Dropping the stream releases the underlying subscription.
pub type SnapshotStream = BoxStream<'static, Result<QuerySnapshot>>;

/// One notification from the change source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuerySnapshot {
    changes: ChangeBatch,
}

impl QuerySnapshot {
    /// Creates a snapshot carrying `changes` in occurrence order.
    pub fn new(changes: ChangeBatch) -> Self {
        Self { changes }
    }

    /// Returns the change events, in occurrence order.
    #[inline]
    pub fn doc_changes(&self) -> &[ChangeEvent] {
        &self.changes
    }

    /// Returns the documents touched by this snapshot.
    pub fn documents(&self) -> Vec<Document> {
        self.changes.iter().map(|e| e.document.clone()).collect()
    }

    /// Returns the number of change events.
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns true if the snapshot carries no changes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Consumes the snapshot and returns its change events.
    pub fn into_changes(self) -> ChangeBatch {
        self.changes
    }
}

impl From<ChangeBatch> for QuerySnapshot {
    fn from(changes: ChangeBatch) -> Self {
        Self::new(changes)
    }
}

impl Project for QuerySnapshot {
    type Output = Vec<Payload>;

    fn project(&self, id_key: Option<&str>) -> Vec<Payload> {
        self.changes.project(id_key)
    }
}

/// A live query that can be subscribed to any number of times.
///
/// Each call to [`LiveQuery::snapshots`] starts an independent subscription.
/// Implementations forward transport and server failures as `Err` items and
/// may end the stream afterwards; Ripple never retries.
pub trait LiveQuery {
    /// Subscribes to the query.
    fn snapshots(&self) -> SnapshotStream;
}

impl<Q: LiveQuery + ?Sized> LiveQuery for &Q {
    fn snapshots(&self) -> SnapshotStream {
        (**self).snapshots()
    }
}

impl<Q: LiveQuery + ?Sized> LiveQuery for Arc<Q> {
    fn snapshots(&self) -> SnapshotStream {
        (**self).snapshots()
    }
}

impl<Q: LiveQuery + ?Sized> LiveQuery for Box<Q> {
    fn snapshots(&self) -> SnapshotStream {
        (**self).snapshots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_snapshot_accessors() {
        let snapshot = QuerySnapshot::new(vec![
            ChangeEvent::added(Document::empty("a").with_field("n", 1i64), 0),
            ChangeEvent::removed(Document::empty("b"), 1),
        ]);

        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.documents()[1], Document::empty("b"));

        let payloads = snapshot.project(Some("id"));
        assert_eq!(payloads[0].get("id").and_then(|v| v.as_str()), Some("a"));
        assert_eq!(payloads[0].get("n").and_then(|v| v.as_i64()), Some(1));

        assert_eq!(snapshot.into_changes().len(), 2);
    }

    #[test]
    fn test_query_snapshot_default_is_empty() {
        assert!(QuerySnapshot::default().is_empty());
    }
}
