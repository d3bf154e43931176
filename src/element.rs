//! Element abstraction consumed by the query pipeline.
//!
//! The pipeline never talks to a UI toolkit directly. It sees an element through three
//! small traits: an event source that delivers occurrences to listeners, read access to
//! the raw text and focus flag, and the two placeholder operations.

pub mod listeners;
pub mod memory;

use crate::error::QueryError;
use std::sync::Arc;

pub use listeners::{ListenerGuard, Listeners};
pub use memory::InputElement;

/// Identifier returned by [`EventSource::listen`], used to detach the listener again.
pub type ListenerId = u64;

/// Callback invoked synchronously for every occurrence the source dispatches.
pub type Listener = Arc<dyn Fn(&Occurrence) + Send + Sync>;

/// Interaction kinds an input element reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementEvent {
    /// The raw text may have changed (keyup).
    TextChanged,
    /// The element gained interaction focus.
    FocusGained,
    /// The element lost interaction focus.
    FocusLost,
}

/// A single delivery from an event source.
#[derive(Debug, Clone, PartialEq)]
pub enum Occurrence {
    Event(ElementEvent),
    /// The source itself failed; listeners should treat this as terminal.
    Failed(QueryError),
}

/// Something that dispatches occurrences to attached listeners.
///
/// Dropping every listener (for example when the host tears the element down) ends all
/// sequences built on top of the source.
pub trait EventSource: Send + Sync + 'static {
    /// Attach a listener. Listeners are invoked in attach order.
    fn listen(&self, listener: Listener) -> ListenerId;

    /// Detach a listener, returning `false` if it was already gone.
    fn unlisten(&self, id: ListenerId) -> bool;
}

/// Read access to the state the pipeline observes.
pub trait QueryElement: EventSource {
    /// Current raw text of the input.
    fn value(&self) -> String;

    /// Whether the input currently holds focus.
    fn has_focus(&self) -> bool;
}

/// Placeholder hint operations. Both are synchronous and idempotent.
pub trait Placeholder: Send + Sync + 'static {
    fn set_placeholder(&self, text: &str);

    fn reset_placeholder(&self);
}
