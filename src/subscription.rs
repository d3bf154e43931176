//! Subscription lifecycle and the `Sequence` stream type.
//!
//! A [`Subscription`] owns an ordered list of teardown actions. It closes exactly once,
//! whichever exit path gets there first: the consumer cancels through a
//! [`SubscriptionHandle`], the sequence completes or errors, or the sequence is dropped.
//! Closing runs the teardowns last-registered-first before returning.

use crate::error::Result;
use futures::stream::{BoxStream, Stream, StreamExt};
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

type Teardown = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct SubscriptionState {
    closed: bool,
    teardowns: Vec<Teardown>,
    waker: Option<Waker>,
}

/// Shared lifecycle of one running sequence.
#[derive(Clone, Default)]
pub struct Subscription {
    state: Arc<Mutex<SubscriptionState>>,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action to run when the subscription closes.
    ///
    /// If the subscription is already closed the action runs immediately.
    pub fn add_teardown(&self, teardown: impl FnOnce() + Send + 'static) {
        let mut state = self.state.lock();
        if state.closed {
            drop(state);
            teardown();
        } else {
            state.teardowns.push(Box::new(teardown));
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Close the subscription and run its teardowns. Returns `false` if it was already
    /// closed, in which case nothing runs.
    pub fn unsubscribe(&self) -> bool {
        let (teardowns, waker) = {
            let mut state = self.state.lock();
            if state.closed {
                return false;
            }
            state.closed = true;
            (std::mem::take(&mut state.teardowns), state.waker.take())
        };

        log::debug!("closing subscription, {} teardown(s)", teardowns.len());
        for teardown in teardowns.into_iter().rev() {
            teardown();
        }
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }

    pub fn handle(&self) -> SubscriptionHandle {
        SubscriptionHandle {
            subscription: self.clone(),
        }
    }

    fn register_waker(&self, waker: &Waker) {
        let mut state = self.state.lock();
        match &state.waker {
            Some(existing) if existing.will_wake(waker) => {}
            _ => state.waker = Some(waker.clone()),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Subscription")
            .field("closed", &state.closed)
            .field("teardowns", &state.teardowns.len())
            .finish()
    }
}

/// The consumer's right to cancel a running sequence.
#[derive(Clone, Debug)]
pub struct SubscriptionHandle {
    subscription: Subscription,
}

impl SubscriptionHandle {
    /// Stop the sequence. Listeners are detached and teardowns have run by the time this
    /// returns. Cancelling an already finished sequence does nothing.
    pub fn cancel(&self) {
        if self.subscription.unsubscribe() {
            log::debug!("subscription cancelled by consumer");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.subscription.is_closed()
    }
}

/// Closes the subscription when the owning sequence is dropped.
struct SubscriptionGuard(Subscription);

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.0.unsubscribe();
    }
}

/// A fallible stream bound to a [`Subscription`].
///
/// The first error is delivered and then the sequence ends. Once the subscription is
/// closed, by any path, polling yields `None`.
pub struct Sequence<T> {
    inner: BoxStream<'static, Result<T>>,
    guard: SubscriptionGuard,
}

impl<T: Send + 'static> Sequence<T> {
    pub fn new(
        inner: impl Stream<Item = Result<T>> + Send + 'static,
        subscription: Subscription,
    ) -> Self {
        Self {
            inner: inner.boxed(),
            guard: SubscriptionGuard(subscription),
        }
    }

    pub fn subscription(&self) -> &Subscription {
        &self.guard.0
    }

    pub fn handle(&self) -> SubscriptionHandle {
        self.guard.0.handle()
    }

    /// Apply an operator to this sequence.
    pub fn pipe<U, F>(self, operator: F) -> Sequence<U>
    where
        F: FnOnce(Self) -> Sequence<U>,
    {
        operator(self)
    }

    /// Rebuild the sequence around a new inner stream, keeping the same subscription.
    pub fn map_inner<U, F, S>(self, f: F) -> Sequence<U>
    where
        U: Send + 'static,
        F: FnOnce(BoxStream<'static, Result<T>>) -> S,
        S: Stream<Item = Result<U>> + Send + 'static,
    {
        let Sequence { inner, guard } = self;
        Sequence {
            inner: f(inner).boxed(),
            guard,
        }
    }
}

impl<T> Stream for Sequence<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let subscription = self.guard.0.clone();
        if subscription.is_closed() {
            return Poll::Ready(None);
        }
        subscription.register_waker(cx.waker());

        match self.inner.poll_next_unpin(cx) {
            Poll::Ready(None) => {
                subscription.unsubscribe();
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(error))) => {
                log::debug!("sequence terminated by error: {}", error);
                subscription.unsubscribe();
                Poll::Ready(Some(Err(error)))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use futures::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        (count, move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn teardowns_run_once_in_reverse_order() {
        let subscription = Subscription::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second"] {
            let order = Arc::clone(&order);
            subscription.add_teardown(move || order.lock().push(name));
        }

        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert_eq!(*order.lock(), vec!["second", "first"]);
    }

    #[test]
    fn late_teardown_runs_immediately() {
        let subscription = Subscription::new();
        subscription.unsubscribe();

        let (count, teardown) = counter();
        subscription.add_teardown(teardown);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn completion_closes_subscription() {
        let subscription = Subscription::new();
        let (count, teardown) = counter();
        subscription.add_teardown(teardown);
        let mut sequence = Sequence::new(stream::iter(vec![Ok(1), Ok(2)]), subscription);

        assert_eq!(sequence.next().await, Some(Ok(1)));
        assert_eq!(sequence.next().await, Some(Ok(2)));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(sequence.next().await, None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(sequence.handle().is_cancelled());
    }

    #[tokio::test]
    async fn error_is_delivered_then_sequence_ends() {
        let subscription = Subscription::new();
        let (count, teardown) = counter();
        subscription.add_teardown(teardown);
        let items = vec![Err(QueryError::other("boom")), Ok(7)];
        let mut sequence = Sequence::new(stream::iter(items), subscription);

        assert_eq!(sequence.next().await, Some(Err(QueryError::other("boom"))));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(sequence.next().await, None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_stops_pending_sequence() {
        let subscription = Subscription::new();
        let (count, teardown) = counter();
        subscription.add_teardown(teardown);
        let mut sequence = Sequence::<u8>::new(stream::pending(), subscription);
        let handle = sequence.handle();

        handle.cancel();
        handle.cancel();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(sequence.next().await, None);
    }

    #[test]
    fn dropping_sequence_runs_teardown() {
        let subscription = Subscription::new();
        let (count, teardown) = counter();
        subscription.add_teardown(teardown);
        let sequence = Sequence::<u8>::new(stream::pending(), subscription);
        let handle = sequence.handle();

        drop(sequence);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        handle.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
