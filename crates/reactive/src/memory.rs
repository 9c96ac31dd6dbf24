//! In-memory change feed.
//!
//! `MemoryFeed` is a [`LiveQuery`] driven by hand: every `snapshots()` call
//! registers a new subscriber channel, and [`MemoryFeed::push`] fans a batch
//! out to all subscribers still listening. It stands in for a real change
//! source in tests and in embedders that compute changes themselves.

use crate::source::{LiveQuery, QuerySnapshot, SnapshotStream};
use futures::channel::mpsc::{self, UnboundedSender};
use futures::stream::StreamExt;
use parking_lot::Mutex;
use ripple_core::{Error, Result};
use ripple_incremental::ChangeBatch;
use std::sync::Arc;

type Subscriber = UnboundedSender<Result<QuerySnapshot>>;

/// A hand-driven change source.
///
/// Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct MemoryFeed {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl MemoryFeed {
    /// Creates a feed with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `changes` as one snapshot to every live subscriber.
    ///
    /// Returns the number of subscribers that received it.
    pub fn push(&self, changes: ChangeBatch) -> usize {
        self.push_snapshot(QuerySnapshot::new(changes))
    }

    /// Delivers a snapshot to every live subscriber.
    pub fn push_snapshot(&self, snapshot: QuerySnapshot) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.unbounded_send(Ok(snapshot.clone())).is_ok());
        tracing::trace!(
            events = snapshot.len(),
            subscribers = subscribers.len(),
            "snapshot pushed"
        );
        subscribers.len()
    }

    /// Delivers a terminal error to every subscriber and disconnects them.
    pub fn fail(&self, error: Error) {
        let subscribers = std::mem::take(&mut *self.subscribers.lock());
        tracing::debug!(subscribers = subscribers.len(), error = %error, "feed failed");
        for tx in subscribers {
            // A subscriber that already hung up does not need the error.
            let _ = tx.unbounded_send(Err(error.clone()));
            tx.close_channel();
        }
    }

    /// Ends every subscriber's stream without an error.
    pub fn close(&self) {
        let subscribers = std::mem::take(&mut *self.subscribers.lock());
        for tx in subscribers {
            tx.close_channel();
        }
    }

    /// Returns the number of subscribers still listening.
    ///
    /// Subscribers whose stream was dropped are pruned first.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

impl LiveQuery for MemoryFeed {
    fn snapshots(&self) -> SnapshotStream {
        let (tx, rx) = mpsc::unbounded();
        self.subscribers.lock().push(tx);
        rx.boxed()
    }
}
