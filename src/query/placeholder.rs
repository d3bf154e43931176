//! Placeholder side-effect operator.

use super::SearchQuery;
use crate::element::Placeholder;
use crate::subscription::Sequence;
use futures::stream::StreamExt;
use std::sync::Arc;

/// Build an operator that hides the placeholder of `element` while the query is
/// focused and shows it otherwise.
///
/// The placeholder is reset exactly once when the sequence ends, whether it completes,
/// errors, is cancelled through its handle, or is dropped. Items pass through
/// unchanged.
pub fn apply_placeholder_effect<P: Placeholder>(
    element: Arc<P>,
) -> impl FnOnce(Sequence<SearchQuery>) -> Sequence<SearchQuery> {
    move |states| {
        let teardown_element = Arc::clone(&element);
        states.subscription().add_teardown(move || {
            log::debug!("restoring placeholder");
            teardown_element.reset_placeholder();
        });

        states.map_inner(move |inner| {
            inner.inspect(move |state| {
                if let Ok(query) = state {
                    if query.focus {
                        element.set_placeholder("");
                    } else {
                        element.reset_placeholder();
                    }
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::subscription::Subscription;
    use futures::stream;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingPlaceholder {
        calls: Mutex<Vec<String>>,
    }

    impl Placeholder for RecordingPlaceholder {
        fn set_placeholder(&self, text: &str) {
            self.calls.lock().push(format!("set:{text}"));
        }

        fn reset_placeholder(&self) {
            self.calls.lock().push("reset".to_string());
        }
    }

    fn sequence(items: Vec<crate::error::Result<SearchQuery>>) -> Sequence<SearchQuery> {
        Sequence::new(stream::iter(items), Subscription::new())
    }

    #[tokio::test]
    async fn toggles_with_focus_and_passes_items_through() {
        let placeholder = Arc::new(RecordingPlaceholder::default());
        let items = vec![
            Ok(SearchQuery::new("a", true)),
            Ok(SearchQuery::new("a", false)),
        ];
        let out: Vec<_> = sequence(items.clone())
            .pipe(apply_placeholder_effect(Arc::clone(&placeholder)))
            .collect()
            .await;

        assert_eq!(out, items);
        assert_eq!(
            *placeholder.calls.lock(),
            vec!["set:", "reset", "reset"]
        );
    }

    #[tokio::test]
    async fn resets_once_after_error() {
        let placeholder = Arc::new(RecordingPlaceholder::default());
        let items = vec![
            Ok(SearchQuery::new("a", true)),
            Err(QueryError::source_failure("gone")),
        ];
        let mut states = sequence(items).pipe(apply_placeholder_effect(Arc::clone(&placeholder)));

        assert!(states.next().await.unwrap().is_ok());
        assert!(states.next().await.unwrap().is_err());
        assert!(states.next().await.is_none());
        states.handle().cancel();

        assert_eq!(*placeholder.calls.lock(), vec!["set:", "reset"]);
    }

    #[test]
    fn applying_to_finished_sequence_resets_immediately() {
        let placeholder = Arc::new(RecordingPlaceholder::default());
        let states = sequence(Vec::new());
        states.handle().cancel();

        let _states = states.pipe(apply_placeholder_effect(Arc::clone(&placeholder)));
        assert_eq!(*placeholder.calls.lock(), vec!["reset"]);
    }
}
