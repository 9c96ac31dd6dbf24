//! Ripple Core - Document, value and error types for Ripple live queries.
//!
//! This crate provides the foundational types shared by the Ripple crates:
//!
//! - `Value`: Runtime values stored in document fields
//! - `Document`: An entry with a stable `DocumentId` and a `Payload`
//! - `ChangeType`: The kind of mutation reported for a document
//! - `Error`: Error types for reconciliation and subscriptions
//!
//! # Example
//!
//! ```rust
//! use ripple_core::{Document, Value};
//!
//! let doc = Document::empty("users/1")
//!     .with_field("name", "Alice")
//!     .with_field("age", 30i64);
//!
//! assert_eq!(doc.id().as_str(), "users/1");
//! assert_eq!(doc.get("name"), Some(&Value::from("Alice")));
//! ```

#![no_std]

extern crate alloc;

mod document;
mod error;
mod types;
mod value;

pub use document::{Document, DocumentId, Payload};
pub use error::{Error, Result};
pub use types::ChangeType;
pub use value::Value;
