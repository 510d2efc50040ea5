//! Subscriber identity and the per-signal subscriber table.
//!
//! Every computation carries a [`SubscriberId`]. Each signal owns a
//! [`SubscriberList`] mapping those IDs to weak computation handles. The list
//! is the signal-to-computation adjacency of the whole system: reads insert
//! edges, re-tracking and disposal remove them, and writes walk the list.
//!
//! # Ordering
//!
//! The table is insertion-ordered and duplicate-free. A computation's first
//! subscription fixes its position; re-reading the signal on later runs does
//! not move it. Unsubscribing and subscribing again appends at the end, which
//! is exactly the notification-order contract callers observe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Weak;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::computation::ComputationCore;

/// Unique identifier for a computation.
///
/// Each computation gets a unique ID when created. The ID is used to track
/// dependency edges and to avoid duplicate subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Insertion-ordered table of the computations subscribed to one signal.
///
/// Entries hold weak handles so a subscriber list never keeps a disposed
/// computation alive; dead entries are pruned during notification passes.
pub(crate) struct SubscriberList {
    entries: RwLock<IndexMap<SubscriberId, Weak<ComputationCore>>>,
}

impl SubscriberList {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
        }
    }

    /// Add a subscriber, keeping the position of an existing entry.
    pub fn subscribe(&self, id: SubscriberId, handle: Weak<ComputationCore>) {
        self.entries.write().entry(id).or_insert(handle);
    }

    /// Remove a subscriber, preserving the order of the remaining entries.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.entries.write().shift_remove(&id);
    }

    /// Re-run every live subscriber in subscription order.
    ///
    /// The entries are snapshotted before any subscriber runs, so a run that
    /// mutates this very list (re-tracking, disposal, nested writes) never
    /// happens under the lock. Entries whose computation has been dropped are
    /// pruned after the pass.
    pub fn notify(&self) {
        let snapshot: Vec<(SubscriberId, Weak<ComputationCore>)> = self
            .entries
            .read()
            .iter()
            .map(|(id, handle)| (*id, Weak::clone(handle)))
            .collect();

        if snapshot.is_empty() {
            return;
        }

        let mut dead = Vec::new();
        for (id, handle) in snapshot {
            match handle.upgrade() {
                Some(computation) => computation.run(),
                None => dead.push(id),
            }
        }

        if !dead.is_empty() {
            let mut entries = self.entries.write();
            for id in dead {
                entries.shift_remove(&id);
            }
        }
    }

    /// Number of current subscribers.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}
