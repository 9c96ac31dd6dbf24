//! Event type filter.
//!
//! Selects which change types pass through to the folds. A batch that is
//! empty after filtering is suppressed entirely so that no fold ever
//! observes a no-op step.

use crate::change::{ChangeBatch, ChangeEvent};
use ripple_core::ChangeType;

/// A set of allowed change types.
///
/// Defaults to all three types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventTypes {
    bits: u8,
}

impl EventTypes {
    /// Allows every change type.
    pub const ALL: EventTypes = EventTypes { bits: 0b111 };

    /// Allows no change type.
    pub const NONE: EventTypes = EventTypes { bits: 0 };

    #[inline]
    fn bit(change_type: ChangeType) -> u8 {
        match change_type {
            ChangeType::Added => 0b001,
            ChangeType::Modified => 0b010,
            ChangeType::Removed => 0b100,
        }
    }

    /// Allows exactly the given change types.
    pub fn only(types: &[ChangeType]) -> Self {
        types.iter().fold(Self::NONE, |set, &t| set.with(t))
    }

    /// Returns this set with `change_type` allowed.
    #[inline]
    pub fn with(self, change_type: ChangeType) -> Self {
        Self {
            bits: self.bits | Self::bit(change_type),
        }
    }

    /// Returns this set with `change_type` disallowed.
    #[inline]
    pub fn without(self, change_type: ChangeType) -> Self {
        Self {
            bits: self.bits & !Self::bit(change_type),
        }
    }

    /// Returns true if `change_type` is allowed.
    #[inline]
    pub fn contains(&self, change_type: ChangeType) -> bool {
        self.bits & Self::bit(change_type) != 0
    }

    /// Returns true if every change type is allowed.
    #[inline]
    pub fn is_all(&self) -> bool {
        *self == Self::ALL
    }

    /// Returns true if no change type is allowed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates over the allowed change types.
    pub fn iter(&self) -> impl Iterator<Item = ChangeType> + '_ {
        ChangeType::ALL.into_iter().filter(move |&t| self.contains(t))
    }
}

impl Default for EventTypes {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<ChangeType> for EventTypes {
    fn from(change_type: ChangeType) -> Self {
        Self::NONE.with(change_type)
    }
}

impl From<&[ChangeType]> for EventTypes {
    fn from(types: &[ChangeType]) -> Self {
        Self::only(types)
    }
}

impl<const N: usize> From<[ChangeType; N]> for EventTypes {
    fn from(types: [ChangeType; N]) -> Self {
        Self::only(&types)
    }
}

/// Keeps the events whose type is allowed, preserving order.
///
/// Returns `None` when nothing survives, so callers never emit an empty batch.
///
/// # Example
///
/// ```ignore
/// let only_adds = filter_events(&batch, EventTypes::from(ChangeType::Added));
/// // Some(batch of adds) or None
/// ```
pub fn filter_events(batch: &[ChangeEvent], allowed: EventTypes) -> Option<ChangeBatch> {
    let filtered: ChangeBatch = batch
        .iter()
        .filter(|e| allowed.contains(e.change_type))
        .cloned()
        .collect();
    (!filtered.is_empty()).then_some(filtered)
}

/// Keeps the events whose type is allowed, consuming the input.
pub fn filter_events_owned(batch: ChangeBatch, allowed: EventTypes) -> Option<ChangeBatch> {
    if allowed.is_all() {
        return (!batch.is_empty()).then_some(batch);
    }
    let mut batch = batch;
    batch.retain(|e| allowed.contains(e.change_type));
    (!batch.is_empty()).then_some(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use ripple_core::Document;

    fn mixed_batch() -> ChangeBatch {
        vec![
            ChangeEvent::added(Document::empty("a"), 0),
            ChangeEvent::modified(Document::empty("a"), 0, 0),
            ChangeEvent::added(Document::empty("b"), 1),
            ChangeEvent::removed(Document::empty("a"), 0),
        ]
    }

    #[test]
    fn test_event_types_default_all() {
        let all = EventTypes::default();
        assert!(all.is_all());
        assert_eq!(all.iter().count(), 3);
    }

    #[test]
    fn test_event_types_only() {
        let set = EventTypes::from([ChangeType::Added, ChangeType::Removed]);
        assert!(set.contains(ChangeType::Added));
        assert!(!set.contains(ChangeType::Modified));
        assert!(set.contains(ChangeType::Removed));
        assert_eq!(set.without(ChangeType::Added), EventTypes::from(ChangeType::Removed));
        assert!(EventTypes::only(&[]).is_empty());
    }

    #[test]
    fn test_filter_events_preserves_order() {
        let batch = mixed_batch();
        let filtered = filter_events(&batch, ChangeType::Added.into()).unwrap();

        let ids: Vec<&str> = filtered.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(filtered.iter().all(|e| e.is_added()));
    }

    #[test]
    fn test_filter_events_all_passes_through() {
        let batch = mixed_batch();
        assert_eq!(filter_events(&batch, EventTypes::ALL), Some(batch.clone()));
        assert_eq!(filter_events_owned(batch.clone(), EventTypes::ALL), Some(batch));
    }

    #[test]
    fn test_filter_events_suppresses_empty() {
        let batch = vec![ChangeEvent::added(Document::empty("a"), 0)];
        assert_eq!(filter_events(&batch, ChangeType::Removed.into()), None);
        assert_eq!(filter_events_owned(batch, ChangeType::Removed.into()), None);
        assert_eq!(filter_events(&[], EventTypes::ALL), None);
        assert_eq!(filter_events_owned(Vec::new(), EventTypes::ALL), None);
    }

    #[test]
    fn test_filter_events_owned_matches_borrowed() {
        let batch = mixed_batch();
        let allowed = EventTypes::from([ChangeType::Modified, ChangeType::Removed]);
        assert_eq!(filter_events_owned(batch.clone(), allowed), filter_events(&batch, allowed));
    }
}
