//! Ripple Reactive - Stream pipelines over live query change events.
//!
//! This crate connects a change source to the folds in `ripple-incremental`.
//! A [`LiveQuery`] yields snapshots of change events; the entry points below
//! subscribe to it and return `futures` streams.
//!
//! # Entry Points
//!
//! - `doc_changes(query, events)`: Non-empty filtered change batches
//! - `collection(query)`: Documents in sort order, every change type applied
//! - `sorted_changes(query, events)`: The reconciled set after each batch
//! - `audit_trail(query, events)`: The growing log of filtered changes
//! - `unwrap(stream, id_key)`: Projects any of the above to plain payloads
//! - `subscribe(stream, on_next, on_error)`: Callback-style consumption
//!
//! # Example
//!
//! ```
//! use futures::executor::block_on;
//! use futures::StreamExt;
//! use ripple_core::Document;
//! use ripple_incremental::ChangeEvent;
//! use ripple_reactive::{collection, MemoryFeed, UnwrapExt};
//!
//! let feed = MemoryFeed::new();
//! let docs = collection(&feed).unwrap_payloads(Some("id"));
//!
//! feed.push(vec![ChangeEvent::added(Document::empty("a").with_field("n", 1i64), 0)]);
//! feed.close();
//!
//! let payloads: Vec<_> = block_on(docs.collect());
//! let first = payloads[0].as_ref().unwrap();
//! assert_eq!(first[0].get("id").and_then(|v| v.as_str()), Some("a"));
//! ```

pub mod memory;
pub mod pipeline;
pub mod source;
pub mod subscription;
pub mod unwrap;

pub use memory::MemoryFeed;
pub use pipeline::{
    audit_trail, collection, collection_with, doc_changes, sorted_changes, sorted_changes_with,
    Collection, DocChanges, Folded,
};
pub use source::{LiveQuery, QuerySnapshot, SnapshotStream};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionTask};
pub use unwrap::{unwrap, UnwrapExt};

// Re-export commonly used types from dependencies
pub use ripple_core::{ChangeType, Document, DocumentId, Error, Payload, Result, Value};
pub use ripple_incremental::{
    AuditLog, ChangeBatch, ChangeEvent, DuplicatePolicy, EventTypes, IndexPolicy, ReconcileConfig,
    ReconciledSet,
};
