//! Ripple Incremental - Change reconciliation for live query results.
//!
//! This crate turns batches of positional change events reported by a live
//! query into an ordered, de-duplicated view of the query's current result.
//! Everything here is a pure function of `(state, batch)`; the stream
//! plumbing lives in `ripple-reactive`.
//!
//! # Core Concepts
//!
//! - `ChangeEvent`: One add/modify/remove with old and new positions
//! - `ChangeBatch`: The events delivered by one source notification
//! - `ReconciledSet`: The ordered current result, one entry per live document
//! - `AuditLog`: Every observed event, appended in arrival order
//!
//! # Operators
//!
//! - `filter_events`: Keeps allowed change types, suppressing empty batches
//! - `apply_batch`: Splices a batch into a `ReconciledSet`
//! - `accumulate`: Appends a batch to an `AuditLog`
//! - `project_entry` / `project_entries`: Map entries to plain payloads
//!
//! # Example
//!
//! ```
//! use ripple_core::Document;
//! use ripple_incremental::{apply_batch, ChangeEvent, ReconciledSet};
//!
//! let set = ReconciledSet::new();
//! let set = apply_batch(set, &[ChangeEvent::added(Document::empty("a"), 0)]);
//! let set = apply_batch(set, &[ChangeEvent::added(Document::empty("b"), 0)]);
//! let set = apply_batch(set, &[ChangeEvent::modified(Document::empty("b"), 0, 1)]);
//!
//! let ids: Vec<&str> = set.iter().map(|e| e.id().as_str()).collect();
//! assert_eq!(ids, ["a", "b"]);
//! ```
//!
//! # Caveat
//!
//! Filtering out `Removed` events before reconciliation means the set never
//! learns about deletions and keeps stale entries. That is sometimes wanted
//! (an additive-only view), so it is not corrected here.

#![no_std]

extern crate alloc;

pub mod audit;
pub mod change;
pub mod fold;
pub mod materialize;
pub mod operators;

pub use audit::{accumulate, AuditLog};
pub use change::{ChangeBatch, ChangeBatchExt, ChangeEvent};
pub use fold::{ApplyStats, BatchFold};
pub use materialize::{
    apply_batch, DuplicatePolicy, IndexPolicy, ReconcileConfig, ReconcileFold, ReconciledSet,
};
pub use operators::{
    filter_events, filter_events_owned, project_entries, project_entry, Entry, EventTypes, Project,
};
