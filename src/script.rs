//! Host interaction scripts.
//!
//! The CLI replays a script of host actions against an [`InputElement`], one action per
//! line, so the pipeline can be exercised without a real UI toolkit.
//!
//! ```text
//! # comments and blank lines are skipped
//! type rust book
//! focus-clear
//! blur
//! ```

use crate::consumer::QueryConsumer;
use crate::element::InputElement;
use crate::error::{QueryError, Result};
use crate::query::SearchQuery;
use crate::scheduler::end_of_turn;
use crate::subscription::{Sequence, SubscriptionHandle};
use futures::{FutureExt, StreamExt};

/// One step performed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    /// Replace the text and dispatch a keyup.
    Type(String),
    /// Dispatch a keyup without changing the text.
    KeyUp,
    /// Replace the text silently.
    Set(String),
    /// Empty the text silently.
    Clear,
    Focus,
    /// Focus and empty the text within the same turn.
    FocusClear,
    Blur,
    /// Report an event source failure.
    Fail(String),
    /// Tear down the event source.
    Close,
    /// Cancel the subscription from the consumer side.
    Cancel,
}

impl HostAction {
    /// Parse one script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, Some(rest.trim_start())),
            None => (line, None),
        };

        let action = match (command, argument) {
            ("type", Some(text)) => HostAction::Type(text.to_string()),
            ("type", None) => HostAction::Type(String::new()),
            ("set", Some(text)) => HostAction::Set(text.to_string()),
            ("set", None) => HostAction::Set(String::new()),
            ("fail", argument) => {
                HostAction::Fail(argument.unwrap_or("event source failed").to_string())
            }
            ("keyup", None) => HostAction::KeyUp,
            ("clear", None) => HostAction::Clear,
            ("focus", None) => HostAction::Focus,
            ("focus-clear", None) => HostAction::FocusClear,
            ("blur", None) => HostAction::Blur,
            ("close", None) => HostAction::Close,
            ("cancel", None) => HostAction::Cancel,
            (command, Some(_))
                if matches!(
                    command,
                    "keyup" | "clear" | "focus" | "focus-clear" | "blur" | "close" | "cancel"
                ) =>
            {
                return Err(QueryError::invalid_argument(format!(
                    "'{}' takes no argument",
                    command
                )));
            }
            (command, _) => {
                return Err(QueryError::invalid_argument(format!(
                    "unknown script command '{}'",
                    command
                )));
            }
        };

        Ok(Some(action))
    }

    /// Parse a whole script, reporting the first bad line with its number.
    pub fn parse_script(script: &str) -> Result<Vec<Self>> {
        let mut actions = Vec::new();
        for (index, line) in script.lines().enumerate() {
            match Self::parse(line) {
                Ok(Some(action)) => actions.push(action),
                Ok(None) => {}
                Err(QueryError::InvalidArgument { message }) => {
                    return Err(QueryError::invalid_argument(format!(
                        "line {}: {}",
                        index + 1,
                        message
                    )));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(actions)
    }

    /// Perform the action against `element`, or against `handle` for `Cancel`.
    pub fn apply(&self, element: &InputElement, handle: &SubscriptionHandle) {
        match self {
            HostAction::Type(text) => element.type_text(text.as_str()),
            HostAction::KeyUp => element.key_up(),
            HostAction::Set(text) => element.set_value(text.as_str()),
            HostAction::Clear => element.set_value(""),
            HostAction::Focus => element.focus(),
            HostAction::FocusClear => {
                element.focus();
                element.set_value("");
            }
            HostAction::Blur => element.blur(),
            HostAction::Fail(message) => element.fail(QueryError::source_failure(message)),
            HostAction::Close => {
                element.close();
            }
            HostAction::Cancel => handle.cancel(),
        }
    }
}

/// Replay `actions` against `element`, feeding the resulting states to `consumer`.
///
/// Each action is one host turn. It is applied and every state it makes ready is
/// delivered. Then the turn ends and the states produced by reads deferred to the end
/// of that turn are delivered. `on_action` sees each action before it is applied.
/// Once the script is exhausted, or the sequence has ended, the sequence is cancelled.
///
/// Returns the number of states delivered. A sequence or consumer error is returned
/// as-is, with the sequence torn down.
pub async fn replay<C>(
    actions: &[HostAction],
    element: &InputElement,
    mut states: Sequence<SearchQuery>,
    consumer: &mut C,
    mut on_action: impl FnMut(&HostAction),
) -> Result<usize>
where
    C: QueryConsumer + ?Sized,
{
    let handle = states.handle();
    let mut delivered = deliver_ready(&mut states, consumer).await?;

    for action in actions {
        if handle.is_cancelled() {
            log::debug!("sequence ended, skipping remaining script actions");
            break;
        }
        on_action(action);
        action.apply(element, &handle);
        delivered += deliver_ready(&mut states, consumer).await?;

        end_of_turn().await;
        delivered += deliver_ready(&mut states, consumer).await?;
    }

    handle.cancel();
    consumer.finish().await?;
    Ok(delivered)
}

/// Deliver every state that is ready without waiting for another occurrence.
async fn deliver_ready<C>(states: &mut Sequence<SearchQuery>, consumer: &mut C) -> Result<usize>
where
    C: QueryConsumer + ?Sized,
{
    let mut delivered = 0;
    while let Some(Some(state)) = states.next().now_or_never() {
        consumer.consume(state?).await?;
        delivered += 1;
    }
    Ok(delivered)
}
