//! The search query pipeline.
//!
//! Element occurrences flow through four stages:
//!
//! - [`value`] turns keyups and focus gains into a de-duplicated stream of query values
//! - [`focus`] tracks whether the element holds focus
//! - [`combine`] pairs the latest value with the latest focus state
//! - [`placeholder`] hides the placeholder while focused and restores it on teardown
//!
//! [`watch`] wires the first three together; the placeholder stage is applied by the
//! caller through [`Sequence::pipe`](crate::subscription::Sequence::pipe).

pub mod combine;
pub mod focus;
pub mod placeholder;
pub mod value;
pub mod watch;

use crate::transform::QueryValue;

pub use combine::combine_query_state;
pub use focus::{watch_element_focus, watch_element_focus_sequenced};
pub use placeholder::apply_placeholder_effect;
pub use value::{observe_value, observe_value_sequenced};
pub use watch::{watch_query_state, WatchOptions};

/// Combined state of a search input at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub value: QueryValue,
    pub focus: bool,
}

impl SearchQuery {
    pub fn new(value: impl Into<QueryValue>, focus: bool) -> Self {
        Self {
            value: value.into(),
            focus,
        }
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = if self.focus { "focused" } else { "blurred" };
        write!(f, "{:?} ({})", self.value, marker)
    }
}
