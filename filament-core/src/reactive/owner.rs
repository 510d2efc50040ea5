//! Ownership and disposal.
//!
//! An [`Owner`] is a disposal-scope node. Every top-level autorun gets its
//! own root owner, exposed to the caller as a [`StopHandle`]. Computations,
//! nested scopes, and cleanup callbacks registered under an owner are torn
//! down in reverse-registration order when the owner is disposed, and
//! disposal cascades through nested scopes.
//!
//! Disposal is the only reclamation mechanism: the runtime performs no
//! implicit finalization, and dropping a [`StopHandle`] does not stop
//! anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use super::computation::ComputationCore;
use super::context;

/// An item owned by a disposal scope.
pub(crate) enum Owned {
    Computation(Arc<ComputationCore>),
    Scope(Arc<Owner>),
    Cleanup(Box<dyn FnOnce() + Send>),
}

/// A disposal scope.
///
/// Owners form a tree: the scope of a computation adopts whatever that
/// computation creates while running, so disposing a parent recursively
/// disposes its children.
pub(crate) struct Owner {
    disposed: AtomicBool,
    owned: Mutex<Vec<Owned>>,
}

impl Owner {
    pub fn new() -> Self {
        Self {
            disposed: AtomicBool::new(false),
            owned: Mutex::new(Vec::new()),
        }
    }

    /// Register an item with this scope.
    ///
    /// An item adopted into an already-disposed scope is torn down on the
    /// spot instead of leaking as a live orphan.
    pub fn adopt(&self, item: Owned) {
        if self.disposed.load(Ordering::SeqCst) {
            dispose_item(item);
            return;
        }
        self.owned.lock().push(item);
    }

    /// Tear down everything owned by this scope, newest first. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let items = std::mem::take(&mut *self.owned.lock());
        for item in items.into_iter().rev() {
            dispose_item(item);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

fn dispose_item(item: Owned) {
    match item {
        Owned::Computation(computation) => computation.dispose(),
        Owned::Scope(scope) => scope.dispose(),
        Owned::Cleanup(cleanup) => cleanup(),
    }
}

/// Handle returned by [`create_autorun`](super::create_autorun) and
/// [`bind_circular`](super::bind_circular).
///
/// [`stop`](StopHandle::stop) disposes the underlying root scope. Dropping
/// the handle without calling `stop` leaves the computation running for as
/// long as its signals are written; teardown is always explicit.
pub struct StopHandle {
    owner: Arc<Owner>,
}

impl StopHandle {
    pub(crate) fn new(owner: Arc<Owner>) -> Self {
        Self { owner }
    }

    /// Dispose the owned computations and cleanups. Idempotent: the second
    /// and later calls are no-ops, and no run can occur after the first.
    pub fn stop(&self) {
        self.owner.dispose();
    }

    pub fn is_stopped(&self) -> bool {
        self.owner.is_disposed()
    }
}

impl std::fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopHandle")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Register a cleanup with the currently running computation.
///
/// The callback runs when that computation is disposed, after any children
/// registered later. Outside a computation there is no scope to attach to;
/// the callback is dropped and a diagnostic is logged.
pub fn on_cleanup<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    match context::active().and_then(|active| active.handle.upgrade()) {
        Some(computation) => computation.scope().adopt(Owned::Cleanup(Box::new(f))),
        None => warn!("on_cleanup called outside a computation; callback will never run"),
    }
}
