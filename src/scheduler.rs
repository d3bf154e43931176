//! Cooperative scheduling helpers.

/// Suspend until the end of the current scheduler turn.
///
/// Work queued behind this point observes every mutation the host made synchronously in
/// the turn that woke us, such as an input cleared by its own focus handler.
pub async fn end_of_turn() {
    log::trace!("deferring to end of turn");
    tokio::task::yield_now().await;
}
