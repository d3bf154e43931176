//! Listener registry shared by event source implementations.

use super::{EventSource, Listener, ListenerId, Occurrence};
use parking_lot::Mutex;
use std::sync::Arc;

/// Ordered table of attached listeners.
///
/// Dispatch snapshots the table before invoking callbacks, so a listener may read the
/// element or detach itself without deadlocking.
#[derive(Default)]
pub struct Listeners {
    table: Mutex<ListenerTable>,
}

#[derive(Default)]
struct ListenerTable {
    next_id: ListenerId,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Listener) -> ListenerId {
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.entries.push((id, listener));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut table = self.table.lock();
        let before = table.entries.len();
        table.entries.retain(|(entry_id, _)| *entry_id != id);
        table.entries.len() != before
    }

    /// Invoke every listener attached at the time of the call, in attach order.
    pub fn dispatch(&self, occurrence: &Occurrence) {
        let snapshot: Vec<Listener> = self
            .table
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(occurrence);
        }
    }

    /// Drop every listener. Channels captured by listeners close as a result.
    pub fn clear(&self) -> usize {
        let mut table = self.table.lock();
        let count = table.entries.len();
        table.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.table.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Detaches a listener from its source when dropped.
pub struct ListenerGuard<S: EventSource> {
    source: Arc<S>,
    id: ListenerId,
}

impl<S: EventSource> ListenerGuard<S> {
    /// Attach `listener` to `source` and keep it attached for the guard's lifetime.
    pub fn attach(source: Arc<S>, listener: Listener) -> Self {
        let id = source.listen(listener);
        log::trace!("attached listener {}", id);
        Self { source, id }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<S: EventSource> Drop for ListenerGuard<S> {
    fn drop(&mut self) {
        if self.source.unlisten(self.id) {
            log::trace!("detached listener {}", self.id);
        }
    }
}
