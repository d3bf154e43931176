//! Query state combiner.

use super::SearchQuery;
use crate::operators::{CombineLatest, Sequenced};
use crate::subscription::{Sequence, Subscription};
use crate::transform::QueryValue;
use futures::stream::StreamExt;

/// Pair the latest query value with the latest focus state.
///
/// A new [`SearchQuery`] is emitted whenever either input emits, once both have
/// emitted at least once. Inputs are consumed in the order their occurrences were
/// dispatched, so a state is never built from a value and a focus flag that did not
/// hold at the same time. Ending the combined sequence, by any path, cancels both
/// inputs.
pub fn combine_query_state(
    values: Sequence<Sequenced<QueryValue>>,
    focus: Sequence<Sequenced<bool>>,
) -> Sequence<SearchQuery> {
    let subscription = Subscription::new();
    let value_handle = values.handle();
    let focus_handle = focus.handle();
    subscription.add_teardown(move || {
        value_handle.cancel();
        focus_handle.cancel();
    });

    let states = CombineLatest::new(values, focus)
        .map(|pair| pair.map(|(value, focus)| SearchQuery { value, focus }));
    Sequence::new(states, subscription)
}
