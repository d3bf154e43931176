//! Downstream delivery of query states.
//!
//! The pipeline does not search anything itself. Whatever does (an index, a remote
//! service, a printer in the CLI) implements [`QueryConsumer`] and is fed by
//! [`query_worker_loop`].

use crate::error::Result;
use crate::query::SearchQuery;
use crate::subscription::Sequence;
use async_trait::async_trait;
use futures::StreamExt;

/// Receives every combined query state in emission order.
#[async_trait]
pub trait QueryConsumer: Send {
    /// Handle one state. Returning an error stops the loop and cancels the sequence.
    async fn consume(&mut self, query: SearchQuery) -> Result<()>;

    /// Called once after the sequence ends without error.
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Drain `states` into `consumer` until the sequence ends.
///
/// Returns the number of states delivered. A sequence error or a consumer error is
/// returned as-is; in both cases the sequence has been torn down by the time this
/// returns.
pub async fn query_worker_loop<C>(
    mut states: Sequence<SearchQuery>,
    consumer: &mut C,
) -> Result<usize>
where
    C: QueryConsumer + ?Sized,
{
    let mut delivered = 0;

    while let Some(state) = states.next().await {
        let query = state?;
        log::trace!("delivering {}", query);
        consumer.consume(query).await?;
        delivered += 1;
    }

    consumer.finish().await?;
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::subscription::Subscription;
    use futures::stream;

    /// Consumer that records everything it is handed.
    #[derive(Default)]
    struct CollectingConsumer {
        received: Vec<SearchQuery>,
        finished: bool,
        fail_after: Option<usize>,
    }

    #[async_trait]
    impl QueryConsumer for CollectingConsumer {
        async fn consume(&mut self, query: SearchQuery) -> Result<()> {
            if self.fail_after == Some(self.received.len()) {
                return Err(QueryError::other("consumer full"));
            }
            self.received.push(query);
            Ok(())
        }

        async fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn states(items: Vec<Result<SearchQuery>>) -> Sequence<SearchQuery> {
        Sequence::new(stream::iter(items), Subscription::new())
    }

    #[tokio::test]
    async fn delivers_all_states_then_finishes() {
        let mut consumer = CollectingConsumer::default();
        let items = vec![
            Ok(SearchQuery::new("a", false)),
            Ok(SearchQuery::new("a", true)),
        ];

        let delivered = query_worker_loop(states(items), &mut consumer).await.unwrap();

        assert_eq!(delivered, 2);
        assert_eq!(consumer.received.len(), 2);
        assert!(consumer.finished);
    }

    #[tokio::test]
    async fn sequence_error_is_returned() {
        let mut consumer = CollectingConsumer::default();
        let items = vec![
            Ok(SearchQuery::new("a", false)),
            Err(QueryError::source_failure("gone")),
        ];

        let result = query_worker_loop(states(items), &mut consumer).await;

        assert_eq!(result, Err(QueryError::source_failure("gone")));
        assert_eq!(consumer.received, vec![SearchQuery::new("a", false)]);
        assert!(!consumer.finished);
    }

    #[tokio::test]
    async fn consumer_error_cancels_sequence() {
        let mut consumer = CollectingConsumer {
            fail_after: Some(1),
            ..Default::default()
        };
        let sequence = Sequence::new(
            stream::iter(vec![
                Ok(SearchQuery::new("a", false)),
                Ok(SearchQuery::new("b", false)),
            ])
            .chain(stream::pending()),
            Subscription::new(),
        );
        let handle = sequence.handle();

        let result = query_worker_loop(sequence, &mut consumer).await;

        assert!(matches!(result, Err(QueryError::Other { .. })));
        assert!(handle.is_cancelled());
    }
}
