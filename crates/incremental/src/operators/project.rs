//! Projection of entries to plain payloads.

use crate::audit::AuditLog;
use crate::change::ChangeEvent;
use crate::materialize::ReconciledSet;
use alloc::vec::Vec;
use ripple_core::{Document, Payload, Value};

/// Anything that wraps a single document.
pub trait Entry {
    /// Returns the wrapped document.
    fn entry_document(&self) -> &Document;
}

impl Entry for Document {
    #[inline]
    fn entry_document(&self) -> &Document {
        self
    }
}

impl Entry for ChangeEvent {
    #[inline]
    fn entry_document(&self) -> &Document {
        &self.document
    }
}

impl<E: Entry + ?Sized> Entry for &E {
    #[inline]
    fn entry_document(&self) -> &Document {
        (**self).entry_document()
    }
}

/// Projects a single entry to its payload.
///
/// When `id_key` is given, the document identifier is written under that key,
/// replacing any payload field of the same name.
pub fn project_entry<E: Entry + ?Sized>(entry: &E, id_key: Option<&str>) -> Payload {
    let doc = entry.entry_document();
    let mut payload = doc.data().clone();
    if let Some(key) = id_key {
        payload.insert(key.into(), Value::String(doc.id().as_str().into()));
    }
    payload
}

/// Projects a sequence of entries element-wise, preserving order.
pub fn project_entries<E: Entry>(entries: &[E], id_key: Option<&str>) -> Vec<Payload> {
    entries.iter().map(|e| project_entry(e, id_key)).collect()
}

/// Projection of pipeline outputs to plain payloads.
///
/// Single entries project to a `Payload`; sequences project element-wise to
/// `Vec<Payload>`.
pub trait Project {
    /// The projected form.
    type Output;

    /// Projects `self`, optionally injecting identifiers under `id_key`.
    fn project(&self, id_key: Option<&str>) -> Self::Output;
}

impl Project for Document {
    type Output = Payload;

    fn project(&self, id_key: Option<&str>) -> Payload {
        project_entry(self, id_key)
    }
}

impl Project for ChangeEvent {
    type Output = Payload;

    fn project(&self, id_key: Option<&str>) -> Payload {
        project_entry(self, id_key)
    }
}

impl<E: Entry> Project for [E] {
    type Output = Vec<Payload>;

    fn project(&self, id_key: Option<&str>) -> Vec<Payload> {
        project_entries(self, id_key)
    }
}

impl<E: Entry> Project for Vec<E> {
    type Output = Vec<Payload>;

    fn project(&self, id_key: Option<&str>) -> Vec<Payload> {
        project_entries(self, id_key)
    }
}

impl Project for ReconciledSet {
    type Output = Vec<Payload>;

    fn project(&self, id_key: Option<&str>) -> Vec<Payload> {
        project_entries(self.entries(), id_key)
    }
}

impl Project for AuditLog {
    type Output = Vec<Payload>;

    fn project(&self, id_key: Option<&str>) -> Vec<Payload> {
        project_entries(self.entries(), id_key)
    }
}
