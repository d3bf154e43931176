//! In-memory input element.
//!
//! Stands in for a toolkit text field: the host mutates it through methods that mirror
//! user interaction (`type_text`, `focus`, `blur`) and the element dispatches the
//! matching occurrences synchronously, the way a UI event loop would.

use super::{
    ElementEvent, EventSource, Listener, ListenerId, Listeners, Occurrence, Placeholder,
    QueryElement,
};
use crate::error::QueryError;
use parking_lot::Mutex;

/// Placeholder shown when none is configured.
pub const DEFAULT_PLACEHOLDER: &str = "Search";

#[derive(Debug)]
struct ElementState {
    value: String,
    focused: bool,
    placeholder: String,
    default_placeholder: String,
}

/// Search input backed by plain memory.
pub struct InputElement {
    state: Mutex<ElementState>,
    listeners: Listeners,
}

impl InputElement {
    /// Create an unfocused element holding `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_placeholder(value, DEFAULT_PLACEHOLDER)
    }

    /// Create an element whose default placeholder is `placeholder`.
    pub fn with_placeholder(value: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        Self {
            state: Mutex::new(ElementState {
                value: value.into(),
                focused: false,
                placeholder: placeholder.clone(),
                default_placeholder: placeholder,
            }),
            listeners: Listeners::new(),
        }
    }

    /// Replace the raw text without dispatching anything (programmatic assignment).
    pub fn set_value(&self, value: impl Into<String>) {
        self.state.lock().value = value.into();
    }

    /// Replace the raw text and dispatch a keyup.
    pub fn type_text(&self, value: impl Into<String>) {
        self.set_value(value);
        self.key_up();
    }

    /// Dispatch a keyup without touching the text.
    pub fn key_up(&self) {
        self.listeners
            .dispatch(&Occurrence::Event(ElementEvent::TextChanged));
    }

    /// Give the element focus. Does nothing if it is already focused.
    pub fn focus(&self) {
        {
            let mut state = self.state.lock();
            if state.focused {
                return;
            }
            state.focused = true;
        }
        self.listeners
            .dispatch(&Occurrence::Event(ElementEvent::FocusGained));
    }

    /// Take focus away. Does nothing if the element is not focused.
    pub fn blur(&self) {
        {
            let mut state = self.state.lock();
            if !state.focused {
                return;
            }
            state.focused = false;
        }
        self.listeners
            .dispatch(&Occurrence::Event(ElementEvent::FocusLost));
    }

    /// Report a source failure to every attached listener.
    pub fn fail(&self, error: QueryError) {
        self.listeners.dispatch(&Occurrence::Failed(error));
    }

    /// Tear the event source down, completing every sequence attached to it.
    pub fn close(&self) -> usize {
        self.listeners.clear()
    }

    /// Placeholder text currently displayed.
    pub fn placeholder(&self) -> String {
        self.state.lock().placeholder.clone()
    }

    pub fn default_placeholder(&self) -> String {
        self.state.lock().default_placeholder.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for InputElement {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for InputElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputElement")
            .field("state", &*self.state.lock())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventSource for InputElement {
    fn listen(&self, listener: Listener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

impl QueryElement for InputElement {
    fn value(&self) -> String {
        self.state.lock().value.clone()
    }

    fn has_focus(&self) -> bool {
        self.state.lock().focused
    }
}

impl Placeholder for InputElement {
    fn set_placeholder(&self, text: &str) {
        self.state.lock().placeholder = text.to_string();
    }

    fn reset_placeholder(&self) {
        let mut state = self.state.lock();
        state.placeholder = state.default_placeholder.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recording(element: &InputElement) -> Arc<Mutex<Vec<Occurrence>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        element.listen(Arc::new(move |occurrence: &Occurrence| {
            sink.lock().push(occurrence.clone());
        }));
        seen
    }

    #[test]
    fn type_text_updates_value_then_dispatches() {
        let element = InputElement::new("");
        let seen = recording(&element);

        element.type_text("rust");

        assert_eq!(element.value(), "rust");
        assert_eq!(
            *seen.lock(),
            vec![Occurrence::Event(ElementEvent::TextChanged)]
        );
    }

    #[test]
    fn focus_and_blur_only_dispatch_transitions() {
        let element = InputElement::new("");
        let seen = recording(&element);

        element.focus();
        element.focus();
        element.blur();
        element.blur();

        assert_eq!(
            *seen.lock(),
            vec![
                Occurrence::Event(ElementEvent::FocusGained),
                Occurrence::Event(ElementEvent::FocusLost),
            ]
        );
        assert!(!element.has_focus());
    }

    #[test]
    fn set_value_is_silent() {
        let element = InputElement::new("before");
        let seen = recording(&element);

        element.set_value("after");

        assert_eq!(element.value(), "after");
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn placeholder_resets_to_configured_default() {
        let element = InputElement::with_placeholder("", "Type to search");
        element.set_placeholder("");
        assert_eq!(element.placeholder(), "");

        element.reset_placeholder();
        element.reset_placeholder();
        assert_eq!(element.placeholder(), "Type to search");
    }

    #[test]
    fn close_detaches_everything() {
        let element = InputElement::default();
        recording(&element);
        recording(&element);

        assert_eq!(element.close(), 2);
        assert_eq!(element.listener_count(), 0);
    }
}
