//! Combine-latest over two stamped streams.

use super::Sequenced;
use crate::error::{QueryError, Result};
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Pairs the latest item of two streams, emitting whenever either side produces one.
///
/// Items carry dispatch stamps and are consumed in stamp order across both sides, so
/// the output follows the order in which the host delivered the triggering occurrences.
/// A side that is pending never holds back the other: anything it yields later was
/// stamped later. Nothing is emitted until both sides have produced at least once. When
/// either input ends or fails, items already taken from the other side are still
/// delivered, then the end or the error is forwarded and the stream stops.
pub struct CombineLatest<A, B, L, R> {
    left: A,
    right: B,
    next_left: Option<Sequenced<L>>,
    next_right: Option<Sequenced<R>>,
    latest_left: Option<L>,
    latest_right: Option<R>,
    finished: Option<Finished>,
    done: bool,
}

impl<A, B, L, R> CombineLatest<A, B, L, R>
where
    A: Stream<Item = Result<Sequenced<L>>> + Unpin,
    B: Stream<Item = Result<Sequenced<R>>> + Unpin,
    L: Clone,
    R: Clone,
{
    pub fn new(left: A, right: B) -> Self {
        Self {
            left,
            right,
            next_left: None,
            next_right: None,
            latest_left: None,
            latest_right: None,
            finished: None,
            done: false,
        }
    }

    fn snapshot(&self) -> Option<(L, R)> {
        match (&self.latest_left, &self.latest_right) {
            (Some(left), Some(right)) => Some((left.clone(), right.clone())),
            _ => None,
        }
    }
}

/// How an input stopped producing items.
enum Finished {
    Completed,
    Failed(QueryError),
}

/// Fill `slot` from `stream` if it is empty.
fn refill<S, T>(
    stream: &mut S,
    slot: &mut Option<Sequenced<T>>,
    cx: &mut Context<'_>,
) -> Option<Finished>
where
    S: Stream<Item = Result<Sequenced<T>>> + Unpin,
{
    if slot.is_some() {
        return None;
    }
    match stream.poll_next_unpin(cx) {
        Poll::Ready(Some(Ok(item))) => {
            *slot = Some(item);
            None
        }
        Poll::Ready(Some(Err(error))) => Some(Finished::Failed(error)),
        Poll::Ready(None) => Some(Finished::Completed),
        Poll::Pending => None,
    }
}

impl<A, B, L, R> Stream for CombineLatest<A, B, L, R>
where
    A: Stream<Item = Result<Sequenced<L>>> + Unpin,
    B: Stream<Item = Result<Sequenced<R>>> + Unpin,
    L: Clone + Unpin,
    R: Clone + Unpin,
{
    type Item = Result<(L, R)>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }
        let this = &mut *self;

        loop {
            if this.finished.is_none() {
                let left = refill(&mut this.left, &mut this.next_left, cx);
                let right = refill(&mut this.right, &mut this.next_right, cx);
                this.finished = left.or(right);
            }

            let take_left = match (&this.next_left, &this.next_right) {
                (Some(left), Some(right)) => left.sequence <= right.sequence,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => match this.finished.take() {
                    Some(finished) => {
                        this.done = true;
                        return Poll::Ready(match finished {
                            Finished::Completed => None,
                            Finished::Failed(error) => Some(Err(error)),
                        });
                    }
                    None => return Poll::Pending,
                },
            };

            if take_left {
                this.latest_left = this.next_left.take().map(Sequenced::into_inner);
            } else {
                this.latest_right = this.next_right.take().map(Sequenced::into_inner);
            }

            if let Some(pair) = this.snapshot() {
                return Poll::Ready(Some(Ok(pair)));
            }
        }
    }
}
