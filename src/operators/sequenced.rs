//! Dispatch-order stamps for items produced by host occurrences.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A value tagged with the position of the occurrence that produced it.
///
/// Stamps come from one process-wide counter, so items taken from different streams
/// can be put back into the order the host delivered their occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequenced<T> {
    pub sequence: u64,
    pub value: T,
}

impl<T> Sequenced<T> {
    /// Stamp `value` as happening now.
    pub fn now(value: T) -> Self {
        Self {
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::SeqCst),
            value,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sequenced<U> {
        Sequenced {
            sequence: self.sequence,
            value: f(self.value),
        }
    }
}
