//! Value stream producer.

use crate::element::{ElementEvent, ListenerGuard, Occurrence, QueryElement};
use crate::error::{QueryError, Result};
use crate::operators::{distinct_until_changed_by, Sequenced};
use crate::scheduler::end_of_turn;
use crate::subscription::{Sequence, Subscription};
use crate::transform::{QueryValue, TransformFn};
use futures::future::{ready, BoxFuture};
use futures::stream::{self, Stream, StreamExt};
use futures::FutureExt;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// What a listener hands to the stream side.
enum Signal {
    /// Keyup: the raw text was read and transformed at dispatch time.
    Read(Result<Sequenced<QueryValue>>),
    /// Focus gained: read the raw text once the current turn has finished.
    Deferred,
    Failed(QueryError),
}

/// Stream side of the value listener.
///
/// Keyup reads are delivered in dispatch order. A focus gain schedules one deferred
/// read, taken only once every signal queued so far has been delivered and the current
/// turn has ended. A deferred read therefore never carries older text than a keyup
/// delivered before it.
struct ValueUpdates<E> {
    signals: mpsc::UnboundedReceiver<Signal>,
    element: Arc<E>,
    transform: TransformFn,
    deferred: Option<BoxFuture<'static, ()>>,
}

impl<E: QueryElement> Stream for ValueUpdates<E> {
    type Item = Result<Sequenced<QueryValue>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.signals.poll_recv(cx) {
                Poll::Ready(Some(Signal::Read(result))) => return Poll::Ready(Some(result)),
                Poll::Ready(Some(Signal::Failed(error))) => return Poll::Ready(Some(Err(error))),
                Poll::Ready(Some(Signal::Deferred)) => {
                    if self.deferred.is_none() {
                        self.deferred = Some(end_of_turn().boxed());
                    }
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => break,
            }
        }

        let Some(deferred) = self.deferred.as_mut() else {
            return Poll::Pending;
        };
        if deferred.poll_unpin(cx).is_pending() {
            return Poll::Pending;
        }
        self.deferred = None;

        let read = (self.transform)(&self.element.value());
        Poll::Ready(Some(read.map(Sequenced::now)))
    }
}

/// Observe the normalized value of `element`.
///
/// The first item is `transform` applied to the text at the time of the call. After
/// that every keyup and every focus gain re-evaluates the transform, and only changes
/// are emitted. Focus gains are re-read one scheduler turn late so that a host clearing
/// the input as it gains focus is seen as cleared.
pub fn observe_value<E: QueryElement>(
    element: Arc<E>,
    transform: TransformFn,
) -> Sequence<QueryValue> {
    observe_value_sequenced(element, transform)
        .map_inner(|values| values.map(|item| item.map(Sequenced::into_inner)))
}

/// [`observe_value`] with every item stamped by the occurrence that produced it.
pub fn observe_value_sequenced<E: QueryElement>(
    element: Arc<E>,
    transform: TransformFn,
) -> Sequence<Sequenced<QueryValue>> {
    let (tx, rx) = mpsc::unbounded_channel::<Signal>();

    let weak: Weak<E> = Arc::downgrade(&element);
    let listener_transform = Arc::clone(&transform);
    let guard = ListenerGuard::attach(
        Arc::clone(&element),
        Arc::new(move |occurrence: &Occurrence| {
            let signal = match occurrence {
                Occurrence::Event(ElementEvent::TextChanged) => match weak.upgrade() {
                    Some(element) => {
                        Signal::Read(listener_transform(&element.value()).map(Sequenced::now))
                    }
                    None => return,
                },
                Occurrence::Event(ElementEvent::FocusGained) => Signal::Deferred,
                Occurrence::Event(ElementEvent::FocusLost) => return,
                Occurrence::Failed(error) => Signal::Failed(error.clone()),
            };
            // The receiver is gone once the sequence is dropped; nothing left to notify.
            let _ = tx.send(signal);
        }),
    );
    log::debug!("value stream attached as listener {}", guard.id());

    let subscription = Subscription::new();
    subscription.add_teardown(move || drop(guard));

    let initial = transform(&element.value()).map(Sequenced::now);
    let updates = ValueUpdates {
        signals: rx,
        element,
        transform,
        deferred: None,
    };

    let values = distinct_until_changed_by(
        stream::once(ready(initial)).chain(updates),
        |last: &Sequenced<QueryValue>, next: &Sequenced<QueryValue>| last.value == next.value,
    );
    Sequence::new(values, subscription)
}
