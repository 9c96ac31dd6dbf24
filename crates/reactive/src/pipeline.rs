//! Live query pipelines.
//!
//! Each entry point subscribes to a [`LiveQuery`] and composes explicit
//! stages over the snapshot stream:
//!
//! ```text
//! snapshots -> DocChanges (filter, drop empty) -> Folded<ReconcileFold> -> sorted_changes
//!                                              -> Folded<AuditLog>      -> audit_trail
//!                                              -> (as is)               -> doc_changes
//! ```
//!
//! Every call creates a fresh subscription and fresh fold state. Batches are
//! applied one at a time as they are polled, so a fold never sees two batches
//! at once. The first error ends the stream and releases the subscription.
//!
//! # Caveat
//!
//! Passing an event set without `Removed` to [`sorted_changes`] means the
//! reconciled set never hears about deletions and keeps stale entries. This
//! is an additive-only view, not a bug.

use crate::source::{LiveQuery, SnapshotStream};
use futures::ready;
use futures::stream::{FusedStream, MapOk, Stream, StreamExt, TryStreamExt};
use ripple_core::{Document, Result};
use ripple_incremental::{
    filter_events_owned, AuditLog, BatchFold, ChangeBatch, EventTypes, ReconcileConfig,
    ReconcileFold, ReconciledSet,
};
use std::pin::Pin;
use std::task::{Context, Poll};

// ---------------------------------------------------------------------------
// DocChanges
// ---------------------------------------------------------------------------

/// Non-empty filtered change batches from one subscription.
///
/// Dropping the stream releases the subscription.
pub struct DocChanges {
    /// Source stream; `None` once the stream has terminated.
    inner: Option<SnapshotStream>,
    /// Allowed change types.
    events: EventTypes,
    /// Batches emitted so far.
    emitted: u64,
}

impl DocChanges {
    /// Wraps a snapshot stream.
    pub fn new(inner: SnapshotStream, events: EventTypes) -> Self {
        tracing::debug!(?events, "subscribed to live query");
        Self {
            inner: Some(inner),
            events,
            emitted: 0,
        }
    }

    /// Returns the allowed change types.
    #[must_use]
    pub fn events(&self) -> EventTypes {
        self.events
    }

    /// Returns the number of batches emitted so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Ends the stream and releases the subscription.
    pub fn cancel(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!(emitted = self.emitted, "live query subscription cancelled");
        }
    }
}

impl Stream for DocChanges {
    type Item = Result<ChangeBatch>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        // Loop past snapshots whose batch is empty after filtering.
        loop {
            match ready!(inner.poll_next_unpin(cx)) {
                Some(Ok(snapshot)) => {
                    let size = snapshot.len();
                    match filter_events_owned(snapshot.into_changes(), this.events) {
                        Some(batch) => {
                            this.emitted += 1;
                            return Poll::Ready(Some(Ok(batch)));
                        }
                        None => tracing::trace!(size, "empty batch after filtering, suppressed"),
                    }
                }
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "change source failed, ending stream");
                    this.inner = None;
                    return Poll::Ready(Some(Err(err)));
                }
                None => {
                    tracing::debug!(emitted = this.emitted, "change source completed");
                    this.inner = None;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl FusedStream for DocChanges {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl Drop for DocChanges {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Folded
// ---------------------------------------------------------------------------

/// A fold driven by a [`DocChanges`] stream, emitting its state after each batch.
pub struct Folded<F> {
    batches: DocChanges,
    fold: F,
}

impl<F: BatchFold> Folded<F> {
    /// Drives `fold` with `batches`.
    pub fn new(batches: DocChanges, fold: F) -> Self {
        Self { batches, fold }
    }

    /// Returns the current fold state.
    pub fn state(&self) -> &F::Output {
        self.fold.output()
    }
}

impl<F: BatchFold + Unpin> Stream for Folded<F> {
    type Item = Result<F::Output>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match ready!(this.batches.poll_next_unpin(cx)) {
            Some(Ok(batch)) => match this.fold.fold_batch(&batch) {
                Ok(stats) => {
                    if stats.skipped_duplicates > 0 {
                        tracing::debug!(skipped = stats.skipped_duplicates, "duplicate added events skipped");
                    }
                    tracing::trace!(
                        events = batch.len(),
                        applied = stats.applied,
                        len = this.fold.len(),
                        "batch applied"
                    );
                    Poll::Ready(Some(Ok(this.fold.output().clone())))
                }
                Err(err) => {
                    tracing::warn!(error = %err, "batch rejected, ending stream");
                    this.batches.cancel();
                    Poll::Ready(Some(Err(err)))
                }
            },
            Some(Err(err)) => Poll::Ready(Some(Err(err))),
            None => Poll::Ready(None),
        }
    }
}

impl<F: BatchFold + Unpin> FusedStream for Folded<F> {
    fn is_terminated(&self) -> bool {
        self.batches.is_terminated()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Reconciled documents in sort order.
pub type Collection = MapOk<Folded<ReconcileFold>, fn(ReconciledSet) -> Vec<Document>>;

/// Streams each non-empty filtered change batch, in occurrence order.
pub fn doc_changes<Q>(query: &Q, events: impl Into<EventTypes>) -> DocChanges
where
    Q: LiveQuery + ?Sized,
{
    DocChanges::new(query.snapshots(), events.into())
}

/// Streams the reconciled result set after each batch.
pub fn sorted_changes<Q>(query: &Q, events: impl Into<EventTypes>) -> Folded<ReconcileFold>
where
    Q: LiveQuery + ?Sized,
{
    sorted_changes_with(query, events, ReconcileConfig::default())
}

/// Streams the reconciled result set after each batch, reconciling under `config`.
pub fn sorted_changes_with<Q>(
    query: &Q,
    events: impl Into<EventTypes>,
    config: ReconcileConfig,
) -> Folded<ReconcileFold>
where
    Q: LiveQuery + ?Sized,
{
    Folded::new(doc_changes(query, events), ReconcileFold::new(config))
}

/// Streams the query's documents in sort order.
///
/// Always reconciles every change type, so the output is the full live result.
pub fn collection<Q>(query: &Q) -> Collection
where
    Q: LiveQuery + ?Sized,
{
    collection_with(query, ReconcileConfig::default())
}

/// Streams the query's documents in sort order, reconciling under `config`.
pub fn collection_with<Q>(query: &Q, config: ReconcileConfig) -> Collection
where
    Q: LiveQuery + ?Sized,
{
    sorted_changes_with(query, EventTypes::ALL, config)
        .map_ok(ReconciledSet::into_documents as fn(ReconciledSet) -> Vec<Document>)
}

/// Streams the growing log of every filtered change event.
///
/// The log is never trimmed; avoid this for long-lived subscriptions that
/// need bounded memory.
pub fn audit_trail<Q>(query: &Q, events: impl Into<EventTypes>) -> Folded<AuditLog>
where
    Q: LiveQuery + ?Sized,
{
    Folded::new(doc_changes(query, events), AuditLog::new())
}
