//! Signal implementation.
//!
//! A signal is the observable value cell underneath every reactive variable.
//! Reading it inside a running computation registers a dependency edge;
//! writing it synchronously re-runs every subscriber, in subscription order,
//! before the write returns.
//!
//! # Equality policy
//!
//! Every explicit `set` is a change. There is no equality short-circuit:
//! writing a value identical to the current one still notifies every
//! subscriber. Callers that want change detection can compare in `update`.
//!
//! # Reentrancy
//!
//! Propagation is depth-first: a subscriber's run may write other signals,
//! whose propagation completes before the outer `set` returns. The value
//! lock and subscriber lock are never held while subscriber bodies run, so
//! reentrant reads and writes of the same signal are fine. What the runtime
//! does not guard against is a cycle of computations that keep writing each
//! other forever; that recursion is unbounded by design and exhausts the
//! stack.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::context;
use super::subscriber::SubscriberList;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// An observable value cell holding a `T`.
///
/// Cloning a signal shares the cell: both handles have the same id, value,
/// and subscriber list. This is the crate-internal type behind
/// [`Variable`](super::variable::Variable) and its capability handles.
pub(crate) struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    id: u64,
    value: Arc<RwLock<T>>,
    subscribers: Arc<SubscriberList>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            id: next_signal_id(),
            value: Arc::new(RwLock::new(value)),
            subscribers: Arc::new(SubscriberList::new()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Read the current value.
    ///
    /// If a computation is active in the tracking context, it is subscribed
    /// to this signal (no duplicate entries) and the read is recorded in its
    /// in-progress dependency set.
    pub fn get(&self) -> T {
        if let Some(active) = context::active() {
            self.subscribers.subscribe(active.id, active.handle.clone());
            context::record_read(self.id, &self.subscribers);
        }
        self.value.read().clone()
    }

    /// Read the current value without establishing a dependency edge.
    pub fn get_untracked(&self) -> T {
        self.value.read().clone()
    }

    /// Store `value` and synchronously re-run every subscriber.
    ///
    /// Returns only after all triggered re-runs, transitively, have
    /// completed; callers never observe a partially propagated write.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.value.write();
            *guard = value;
        }
        self.subscribers.notify();
    }

    /// Read-modify-write convenience. Always notifies, like `set`.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = {
            let guard = self.value.read();
            f(&*guard)
        };
        self.set(next);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get_untracked())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
