//! Stateless operators over change batches.
//!
//! - Filter: keeps the events of allowed change types, suppressing empty batches
//! - Project: maps entries or sequences of entries to plain payloads

pub mod filter;
pub mod project;

pub use filter::{filter_events, filter_events_owned, EventTypes};
pub use project::{project_entries, project_entry, Entry, Project};
