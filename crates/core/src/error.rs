//! Error types for Ripple.

use crate::types::ChangeType;
use alloc::string::String;

/// Result type alias for Ripple operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for live query reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The change source failed (network, auth, server). Forwarded unchanged.
    #[error("Change source error: {message}")]
    Source {
        message: String,
    },
    /// An event index points outside the current result set.
    #[error("Index out of range: {change_type} event index {index} for result of length {len}")]
    IndexOutOfRange {
        change_type: ChangeType,
        index: usize,
        len: usize,
    },
    /// An event whose indices do not match its change type.
    #[error("Malformed {change_type} event: {message}")]
    MalformedEvent {
        change_type: ChangeType,
        message: String,
    },
    /// A document identifier appears more than once in the result set.
    #[error("Duplicate document in result set: {id}")]
    DuplicateDocument {
        id: String,
    },
    /// The subscription was cancelled before its stream finished.
    #[error("Subscription aborted")]
    Aborted,
}

impl Error {
    /// Creates a change source error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Error::Source {
            message: message.into(),
        }
    }

    /// Creates an index out of range error.
    pub fn index_out_of_range(change_type: ChangeType, index: usize, len: usize) -> Self {
        Error::IndexOutOfRange {
            change_type,
            index,
            len,
        }
    }

    /// Creates a malformed event error.
    pub fn malformed_event(change_type: ChangeType, message: impl Into<String>) -> Self {
        Error::MalformedEvent {
            change_type,
            message: message.into(),
        }
    }

    /// Creates a duplicate document error.
    pub fn duplicate_document(id: impl Into<String>) -> Self {
        Error::DuplicateDocument { id: id.into() }
    }

    /// Returns true if this error came from the change source.
    #[inline]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Source { .. })
    }

    /// Returns true if this error reports a broken source contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::IndexOutOfRange { .. } | Error::MalformedEvent { .. } | Error::DuplicateDocument { .. }
        )
    }
}
