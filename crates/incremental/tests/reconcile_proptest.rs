//! Property-based tests for ripple-incremental using proptest.

use proptest::prelude::*;
use ripple_core::{ChangeType, Document};
use ripple_incremental::{
    accumulate, filter_events, AuditLog, ChangeBatchExt, ChangeEvent, EventTypes, ReconcileConfig,
    ReconciledSet,
};

/// Turns raw (kind, a, b) triples into a well-formed batch against a model of
/// the set's identifiers, updating the model as each event would.
fn well_formed_batch(model: &mut Vec<String>, next_id: &mut usize, ops: &[(u8, usize, usize)]) -> Vec<ChangeEvent> {
    let mut batch = Vec::new();
    for &(kind, a, b) in ops {
        let len = model.len();
        match kind % 3 {
            0 => {
                let at = a % (len + 1);
                let id = format!("d{next_id}");
                *next_id += 1;
                model.insert(at, id.clone());
                batch.push(ChangeEvent::added(Document::empty(id), at));
            }
            1 if len > 0 => {
                let from = a % len;
                let to = b % len;
                let id = model.remove(from);
                model.insert(to, id.clone());
                batch.push(ChangeEvent::modified(Document::empty(id).with_field("v", b as i64), from, to));
            }
            2 if len > 0 => {
                let from = a % len;
                let id = model.remove(from);
                batch.push(ChangeEvent::removed(Document::empty(id), from));
            }
            _ => {}
        }
    }
    batch
}

fn ops_strategy() -> impl Strategy<Value = Vec<Vec<(u8, usize, usize)>>> {
    prop::collection::vec(prop::collection::vec((0u8..3, 0usize..64, 0usize..64), 0..20), 1..10)
}

proptest! {
    /// Length after each batch equals initial + added - removed.
    #[test]
    fn reconcile_length_matches_net_count(batches in ops_strategy()) {
        let mut model = Vec::new();
        let mut next_id = 0;
        let mut set = ReconciledSet::new();
        for ops in &batches {
            let batch = well_formed_batch(&mut model, &mut next_id, ops);
            let before = set.len() as i64;
            set = set.apply_batch(&batch);
            prop_assert_eq!(set.len() as i64, before + batch.net_count());
        }
    }

    /// The set's identifiers track the model exactly and stay unique.
    #[test]
    fn reconcile_matches_model(batches in ops_strategy()) {
        let mut model = Vec::new();
        let mut next_id = 0;
        let mut set = ReconciledSet::new();
        for ops in &batches {
            let batch = well_formed_batch(&mut model, &mut next_id, ops);
            set = set.apply_batch(&batch);
            let ids: Vec<&str> = set.iter().map(|e| e.id().as_str()).collect();
            prop_assert_eq!(ids, model.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert!(set.first_duplicate().is_none());
        }
    }

    /// Validation never changes the outcome of well-formed input.
    #[test]
    fn validated_matches_trusted(batches in ops_strategy()) {
        let mut model = Vec::new();
        let mut next_id = 0;
        let config = ReconcileConfig::validated();
        let mut trusted = ReconciledSet::new();
        let mut validated = ReconciledSet::new();
        for ops in &batches {
            let batch = well_formed_batch(&mut model, &mut next_id, ops);
            trusted = trusted.apply_batch(&batch);
            validated = validated.try_apply_batch(&batch, &config).unwrap();
        }
        prop_assert_eq!(trusted, validated);
    }

    /// Re-adding the document already at an index leaves the set unchanged.
    #[test]
    fn duplicate_add_is_idempotent(ops in prop::collection::vec((0u8..3, 0usize..64, 0usize..64), 1..30), pick in 0usize..64) {
        let mut model = Vec::new();
        let mut next_id = 0;
        let set = ReconciledSet::new().apply_batch(&well_formed_batch(&mut model, &mut next_id, &ops));
        prop_assume!(!set.is_empty());

        let at = pick % set.len();
        let doc = set.get(at).unwrap().document().clone();
        let again = set.clone().apply_batch(&[ChangeEvent::added(doc, at)]);
        prop_assert_eq!(again, set);
    }

    /// A move keeps the size and lands the moved identifier at new_index.
    #[test]
    fn modify_moves_identifier(size in 1usize..40, from in 0usize..40, to in 0usize..40) {
        let adds: Vec<ChangeEvent> = (0..size).map(|i| ChangeEvent::added(Document::empty(format!("d{i}")), i)).collect();
        let set = ReconciledSet::new().apply_batch(&adds);
        let (from, to) = (from % size, to % size);
        let moved = set.get(from).unwrap().document().clone();

        let after = set.clone().apply_batch(&[ChangeEvent::modified(moved.clone(), from, to)]);
        prop_assert_eq!(after.len(), set.len());
        prop_assert_eq!(after.get(to).unwrap().id(), moved.id());
    }

    /// Filtering keeps only allowed types and never yields an empty batch.
    #[test]
    fn filter_only_allowed(kinds in prop::collection::vec(0u8..3, 0..30), mask in 0u8..8) {
        let batch: Vec<ChangeEvent> = kinds.iter().enumerate().map(|(i, k)| {
            let doc = Document::empty(format!("d{i}"));
            match k {
                0 => ChangeEvent::added(doc, i),
                1 => ChangeEvent::modified(doc, i, i),
                _ => ChangeEvent::removed(doc, i),
            }
        }).collect();
        let allowed = ChangeType::ALL
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .fold(EventTypes::NONE, |set, (_, &t)| set.with(t));

        match filter_events(&batch, allowed) {
            Some(filtered) => {
                prop_assert!(!filtered.is_empty());
                prop_assert!(filtered.iter().all(|e| allowed.contains(e.change_type)));
                let expected = batch.iter().filter(|e| allowed.contains(e.change_type)).count();
                prop_assert_eq!(filtered.len(), expected);
            }
            None => {
                prop_assert!(batch.iter().all(|e| !allowed.contains(e.change_type)));
            }
        }
    }

    /// The audit log length is the running sum of batch sizes.
    #[test]
    fn audit_log_is_monotonic(sizes in prop::collection::vec(0usize..10, 1..20)) {
        let mut log = AuditLog::new();
        let mut total = 0;
        for (n, size) in sizes.iter().enumerate() {
            let batch: Vec<ChangeEvent> = (0..*size)
                .map(|i| ChangeEvent::added(Document::empty(format!("b{n}-{i}")), 0))
                .collect();
            let before = log.len();
            log = accumulate(log, &batch);
            total += size;
            prop_assert!(log.len() >= before);
            prop_assert_eq!(log.len(), total);
        }
    }
}
