//! Callback subscriptions over pipeline streams.
//!
//! [`subscribe`] turns any pipeline into a push-style subscription: a task
//! future that feeds each item to a callback, and a [`Subscription`] handle
//! that cancels it. The caller decides where the task runs (spawn it on an
//! executor or `block_on` it). Cancelling drops the pipeline, which releases
//! the underlying live query subscription.

use futures::future::{AbortHandle, Abortable, BoxFuture, FutureExt};
use futures::stream::{Stream, StreamExt};
use ripple_core::{Error, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_subscription_id() -> SubscriptionId {
    NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a running subscription.
///
/// Dropping the handle unsubscribes.
pub struct Subscription {
    id: SubscriptionId,
    abort: AbortHandle,
    finished: Arc<AtomicBool>,
}

impl Subscription {
    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns true once the task has finished or been cancelled.
    pub fn is_closed(&self) -> bool {
        self.finished.load(Ordering::Acquire) || self.abort.is_aborted()
    }

    /// Cancels the subscription.
    ///
    /// The task resolves to [`Error::Aborted`] the next time it is polled and
    /// drops its stream. No further callbacks run.
    pub fn unsubscribe(&self) {
        if !self.is_closed() {
            tracing::debug!(id = self.id, "unsubscribing");
            self.abort.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// The future driving a subscription.
///
/// Resolves to `Ok(())` when the stream ends, to the stream's error if the
/// stream failed, or to [`Error::Aborted`] after [`Subscription::unsubscribe`].
#[must_use = "a subscription does nothing unless its task is polled"]
pub struct SubscriptionTask {
    id: SubscriptionId,
    inner: Option<Abortable<BoxFuture<'static, Result<()>>>>,
    finished: Arc<AtomicBool>,
}

impl SubscriptionTask {
    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Future for SubscriptionTask {
    type Output = Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(Err(Error::Aborted));
        };
        let outcome = match inner.poll_unpin(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(_aborted)) => Err(Error::Aborted),
        };
        // Release the stream, and with it the upstream subscription, right away.
        this.inner = None;
        this.finished.store(true, Ordering::Release);
        tracing::debug!(id = this.id, ok = outcome.is_ok(), "subscription finished");
        Poll::Ready(outcome)
    }
}

/// Subscribes callbacks to a pipeline.
///
/// `on_next` receives every item in order. The first error goes to
/// `on_error` and ends the subscription.
///
/// # Example
///
/// ```ignore
/// let (subscription, task) = subscribe(
///     sorted_changes(&query, EventTypes::ALL),
///     |set| render(&set),
///     |err| eprintln!("{err}"),
/// );
/// spawn(task);
/// // later
/// subscription.unsubscribe();
/// ```
pub fn subscribe<S, T, N, E>(stream: S, mut on_next: N, on_error: E) -> (Subscription, SubscriptionTask)
where
    S: Stream<Item = Result<T>> + Send + 'static,
    T: Send + 'static,
    N: FnMut(T) + Send + 'static,
    E: FnOnce(Error) + Send + 'static,
{
    let id = next_subscription_id();
    let driver = async move {
        let mut stream = Box::pin(stream);
        while let Some(item) = stream.next().await {
            match item {
                Ok(value) => on_next(value),
                Err(err) => {
                    on_error(err.clone());
                    return Err(err);
                }
            }
        }
        Ok(())
    };

    let (abort, registration) = AbortHandle::new_pair();
    let finished = Arc::new(AtomicBool::new(false));
    tracing::debug!(id, "subscription created");

    let subscription = Subscription {
        id,
        abort,
        finished: finished.clone(),
    };
    let task = SubscriptionTask {
        id,
        inner: Some(Abortable::new(driver.boxed(), registration)),
        finished,
    };
    (subscription, task)
}
