//! Suppression of consecutive repeated items.

use crate::error::Result;
use futures::future::ready;
use futures::stream::{Stream, StreamExt};

/// Suppress consecutive `Ok` items equal to the last one emitted.
///
/// Errors always pass through and do not reset the comparison.
pub fn distinct_until_changed<T, S>(stream: S) -> impl Stream<Item = Result<T>>
where
    S: Stream<Item = Result<T>>,
    T: PartialEq + Clone,
{
    distinct_until_changed_by(stream, |last: &T, next: &T| last == next)
}

/// Like [`distinct_until_changed`], comparing items with `same` instead of `==`.
pub fn distinct_until_changed_by<T, S, F>(stream: S, same: F) -> impl Stream<Item = Result<T>>
where
    S: Stream<Item = Result<T>>,
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let mut last: Option<T> = None;
    stream.filter_map(move |item| {
        let forwarded = match item {
            Ok(value) if last.as_ref().is_some_and(|last| same(last, &value)) => None,
            Ok(value) => {
                last = Some(value.clone());
                Some(Ok(value))
            }
            Err(error) => Some(Err(error)),
        };
        ready(forwarded)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use futures::stream;
    use proptest::prelude::*;

    async fn collect(items: Vec<Result<String>>) -> Vec<Result<String>> {
        distinct_until_changed(stream::iter(items)).collect().await
    }

    fn ok(values: &[&str]) -> Vec<Result<String>> {
        values.iter().map(|v| Ok(v.to_string())).collect()
    }

    #[tokio::test]
    async fn suppresses_adjacent_duplicates() {
        let out = collect(ok(&["a", "a", "b", "b", "b", "c"])).await;
        assert_eq!(out, ok(&["a", "b", "c"]));
    }

    #[tokio::test]
    async fn keeps_non_adjacent_repeats() {
        let out = collect(ok(&["a", "b", "a"])).await;
        assert_eq!(out, ok(&["a", "b", "a"]));
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let items = vec![
            Ok("a".to_string()),
            Err(QueryError::other("x")),
            Ok("a".to_string()),
        ];
        let out = collect(items).await;
        assert_eq!(
            out,
            vec![Ok("a".to_string()), Err(QueryError::other("x"))]
        );
    }

    #[tokio::test]
    async fn custom_comparison_ignores_stamps() {
        let items = vec![Ok((1, "a")), Ok((2, "a")), Ok((3, "b"))];
        let out: Vec<_> =
            distinct_until_changed_by(stream::iter(items), |last: &(u8, &str), next| {
                last.1 == next.1
            })
            .collect()
            .await;
        assert_eq!(out, vec![Ok((1, "a")), Ok((3, "b"))]);
    }

    proptest! {
        #[test]
        fn output_has_no_adjacent_duplicates(input in prop::collection::vec(0u8..4, 0..40)) {
            let items: Vec<Result<u8>> = input.iter().copied().map(Ok).collect();
            let out: Vec<u8> = futures::executor::block_on(
                distinct_until_changed(stream::iter(items))
                    .map(|item| item.unwrap())
                    .collect::<Vec<_>>(),
            );

            prop_assert!(out.windows(2).all(|pair| pair[0] != pair[1]));

            let mut expected = input.clone();
            expected.dedup();
            prop_assert_eq!(out, expected);
        }
    }
}
