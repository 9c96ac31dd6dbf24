//! Change type definitions.
//!
//! This module defines the kinds of mutation a live query can report for a
//! document in its result set.

use core::fmt;

/// The kind of mutation reported for a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeType {
    /// The document entered the result set.
    Added,
    /// The document's payload or position changed.
    Modified,
    /// The document left the result set.
    Removed,
}

impl ChangeType {
    /// All change types, in declaration order.
    pub const ALL: [ChangeType; 3] = [ChangeType::Added, ChangeType::Modified, ChangeType::Removed];

    /// Returns the lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Modified => "modified",
            ChangeType::Removed => "removed",
        }
    }

    /// Returns the effect of this change on the result set length.
    #[inline]
    pub fn weight(&self) -> i64 {
        match self {
            ChangeType::Added => 1,
            ChangeType::Modified => 0,
            ChangeType::Removed => -1,
        }
    }

    /// Returns true if events of this type carry an `old_index`.
    #[inline]
    pub fn has_old_index(&self) -> bool {
        !matches!(self, ChangeType::Added)
    }

    /// Returns true if events of this type carry a `new_index`.
    #[inline]
    pub fn has_new_index(&self) -> bool {
        !matches!(self, ChangeType::Removed)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
