//! Pipeline assembly.

use super::{
    combine_query_state, observe_value_sequenced, watch_element_focus_sequenced, SearchQuery,
};
use crate::element::QueryElement;
use crate::subscription::{Sequence, SubscriptionHandle};
use crate::transform::{default_transform, TransformFn};
use std::sync::Arc;

/// Options for [`watch_query_state`].
#[derive(Clone, Default)]
pub struct WatchOptions {
    /// Overrides the default trim normalization.
    pub transform: Option<TransformFn>,
}

impl WatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(transform);
        self
    }
}

impl std::fmt::Debug for WatchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchOptions")
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Watch the search query held by `element`.
///
/// Each call attaches its own listeners. The returned handle cancels the sequence
/// synchronously; teardowns registered by operators applied later through
/// [`Sequence::pipe`] also run on cancel, since they share the same subscription.
pub fn watch_query_state<E: QueryElement>(
    element: Arc<E>,
    options: WatchOptions,
) -> (Sequence<SearchQuery>, SubscriptionHandle) {
    let transform = options.transform.unwrap_or_else(default_transform);
    let values = observe_value_sequenced(Arc::clone(&element), transform);
    let focus = watch_element_focus_sequenced(element);

    let states = combine_query_state(values, focus);
    let handle = states.handle();
    (states, handle)
}
