//! Document structure for live query results.
//!
//! A `Document` is an opaque entry with a stable identifier and a data
//! payload. The identifier never changes for the life of the document; the
//! payload is replaced wholesale when the source reports a modification.

use crate::value::Value;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

/// A document's field map: field name to value.
pub type Payload = BTreeMap<String, Value>;

/// Stable identifier of a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier and returns the inner string.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DocumentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<DocumentId> for Value {
    fn from(id: DocumentId) -> Self {
        Value::String(id.0)
    }
}

/// A document in a live query result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Stable identifier of this document.
    id: DocumentId,
    /// Field values of this document.
    data: Payload,
}

impl Document {
    /// Creates a new document with the given identifier and payload.
    pub fn new(id: impl Into<DocumentId>, data: Payload) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Creates a document with no fields.
    pub fn empty(id: impl Into<DocumentId>) -> Self {
        Self::new(id, Payload::new())
    }

    /// Returns a copy of this document with `field` set to `value`.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// Returns the document identifier.
    #[inline]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Returns the document payload.
    #[inline]
    pub fn data(&self) -> &Payload {
        &self.data
    }

    /// Returns the value of a single field.
    #[inline]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Returns the number of fields in the payload.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the payload has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the document and returns its identifier and payload.
    pub fn into_parts(self) -> (DocumentId, Payload) {
        (self.id, self.data)
    }
}
