//! Projection stage for pipeline outputs.
//!
//! `unwrap` maps any pipeline's items (single entries, batches, reconciled
//! sets, audit logs, document lists) to plain payloads, optionally writing
//! each document's identifier under `id_key`. Errors pass through untouched.

use futures::stream::{Stream, StreamExt};
use ripple_core::Result;
use ripple_incremental::Project;

/// Projects every `Ok` item of `stream` to plain payloads.
///
/// # Example
///
/// ```ignore
/// let payloads = unwrap(collection(&query), Some("id"));
/// // Stream<Item = Result<Vec<Payload>>>
/// ```
pub fn unwrap<S, T>(stream: S, id_key: Option<&str>) -> impl Stream<Item = Result<T::Output>>
where
    S: Stream<Item = Result<T>>,
    T: Project,
{
    let id_key = id_key.map(str::to_owned);
    stream.map(move |item| item.map(|value| value.project(id_key.as_deref())))
}

/// Extension trait attaching the projection stage to any pipeline.
pub trait UnwrapExt<T: Project>: Stream<Item = Result<T>> + Sized {
    /// See [`unwrap`].
    fn unwrap_payloads(self, id_key: Option<&str>) -> impl Stream<Item = Result<T::Output>> {
        unwrap(self, id_key)
    }
}

impl<S, T> UnwrapExt<T> for S
where
    S: Stream<Item = Result<T>>,
    T: Project,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFeed;
    use crate::pipeline::{collection, doc_changes, sorted_changes};
    use futures::executor::block_on;
    use futures::stream;
    use ripple_core::{Document, Error, Payload, Value};
    use ripple_incremental::{ChangeEvent, EventTypes};

    #[test]
    fn test_unwrap_single_entries() {
        let docs = stream::iter(vec![
            Ok(Document::empty("a").with_field("n", 1i64)),
            Err(Error::upstream("down")),
        ]);
        let out: Vec<Result<Payload>> = block_on(unwrap(docs, Some("id")).collect());

        let first = out[0].as_ref().unwrap();
        assert_eq!(first.get("id"), Some(&Value::from("a")));
        assert_eq!(first.get("n"), Some(&Value::Int64(1)));
        assert_eq!(out[1], Err(Error::upstream("down")));
    }

    #[test]
    fn test_unwrap_collection() {
        let feed = MemoryFeed::new();
        let payloads = collection(&feed).unwrap_payloads(Some("id"));

        feed.push(vec![
            ChangeEvent::added(Document::empty("a").with_field("id", "shadowed"), 0),
            ChangeEvent::added(Document::empty("b"), 0),
        ]);
        feed.close();

        let out: Vec<Vec<Payload>> = block_on(payloads.map(|p| p.unwrap()).collect());
        assert_eq!(out.len(), 1);
        let ids: Vec<_> = out[0].iter().map(|p| p.get("id").and_then(|v| v.as_str())).collect();
        assert_eq!(ids, vec![Some("b"), Some("a")]);
    }

    #[test]
    fn test_unwrap_without_key() {
        let feed = MemoryFeed::new();
        let payloads = unwrap(sorted_changes(&feed, EventTypes::ALL), None);

        let doc = Document::empty("a").with_field("name", "Alice");
        feed.push(vec![ChangeEvent::added(doc.clone(), 0)]);
        feed.close();

        let out: Vec<_> = block_on(payloads.map(|p| p.unwrap()).collect());
        assert_eq!(out, vec![vec![doc.data().clone()]]);
    }

    #[test]
    fn test_unwrap_batches() {
        let feed = MemoryFeed::new();
        let payloads = doc_changes(&feed, EventTypes::ALL).unwrap_payloads(Some("key"));

        feed.push(vec![ChangeEvent::removed(Document::empty("z"), 0)]);
        feed.close();

        let out: Vec<_> = block_on(payloads.map(|p| p.unwrap()).collect());
        assert_eq!(out[0][0].get("key"), Some(&Value::from("z")));
    }
}
