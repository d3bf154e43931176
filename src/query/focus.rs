//! Focus state tracker.

use crate::element::{ElementEvent, ListenerGuard, Occurrence, QueryElement};
use crate::operators::Sequenced;
use crate::subscription::{Sequence, Subscription};
use futures::future::ready;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Observe whether `element` holds focus.
///
/// Emits the current focus state immediately, then `true` on every focus gain and
/// `false` on every focus loss.
pub fn watch_element_focus<E: QueryElement>(element: Arc<E>) -> Sequence<bool> {
    watch_element_focus_sequenced(element)
        .map_inner(|states| states.map(|item| item.map(Sequenced::into_inner)))
}

/// [`watch_element_focus`] with every item stamped by the occurrence that produced it.
pub fn watch_element_focus_sequenced<E: QueryElement>(
    element: Arc<E>,
) -> Sequence<Sequenced<bool>> {
    let (tx, rx) = mpsc::unbounded_channel();

    let guard = ListenerGuard::attach(
        Arc::clone(&element),
        Arc::new(move |occurrence: &Occurrence| {
            let state = match occurrence {
                Occurrence::Event(ElementEvent::FocusGained) => Ok(Sequenced::now(true)),
                Occurrence::Event(ElementEvent::FocusLost) => Ok(Sequenced::now(false)),
                Occurrence::Event(ElementEvent::TextChanged) => return,
                Occurrence::Failed(error) => Err(error.clone()),
            };
            let _ = tx.send(state);
        }),
    );
    log::debug!("focus tracker attached as listener {}", guard.id());

    let subscription = Subscription::new();
    subscription.add_teardown(move || drop(guard));

    let initial = Ok(Sequenced::now(element.has_focus()));
    let states = stream::once(ready(initial)).chain(UnboundedReceiverStream::new(rx));
    Sequence::new(states, subscription)
}
