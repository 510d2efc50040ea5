//! Computations.
//!
//! A computation is a re-runnable unit of work with a dynamically discovered
//! dependency set. Running it pushes a tracking frame, executes the body, and
//! rebuilds the dependency set from whatever was actually read: a branch that
//! stops reading a signal stops reacting to it from the next write on.
//!
//! # Propagation
//!
//! Re-runs happen synchronously, depth-first, from inside `Signal::set`.
//! A body may itself write other signals, nesting further propagation to
//! arbitrary depth. Two computations that keep writing each other's signals
//! without a breaking mechanism recurse until the stack is exhausted; the
//! runtime does not detect cycles (see `bind_circular` for the pairwise
//! mitigation).
//!
//! # Previous-value threading
//!
//! An autorun body receives its previous return value (`None` on the first
//! run) and returns the value handed to the next run. The slot lives behind
//! its own mutex so the body itself stays `Fn` and reentrant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use super::context::{self, ActiveComputation, ReadSet, TrackingFrame};
use super::owner::{Owned, Owner, StopHandle};
use super::subscriber::SubscriberId;

/// A computation body, type-erased.
pub(crate) type Body = Arc<dyn Fn() + Send + Sync>;

/// The re-runnable core behind every autorun and binding side.
pub(crate) struct ComputationCore {
    id: SubscriberId,

    /// The body, dropped on dispose so captured handles are released.
    body: RwLock<Option<Body>>,

    /// Dependency edges established by the most recent completed run.
    dependencies: Mutex<ReadSet>,

    /// Children and cleanups registered while this computation was running.
    scope: Owner,

    disposed: AtomicBool,
}

impl ComputationCore {
    pub fn new(body: Body) -> Arc<Self> {
        Arc::new(Self {
            id: SubscriberId::new(),
            body: RwLock::new(Some(body)),
            dependencies: Mutex::new(ReadSet::new()),
            scope: Owner::new(),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn scope(&self) -> &Owner {
        &self.scope
    }

    /// Re-execute the body, re-tracking dependencies from scratch.
    ///
    /// Signals subscribed on the previous run but not read this time are
    /// unsubscribed before the run completes. The read set is scoped to this
    /// call's tracking frame, so reentrant writes triggered by the body
    /// cannot corrupt it.
    pub fn run(self: &Arc<Self>) {
        if self.is_disposed() {
            return;
        }
        let body = match self.body.read().as_ref() {
            Some(body) => Arc::clone(body),
            None => return,
        };

        let frame = TrackingFrame::enter(Some(ActiveComputation {
            id: self.id,
            handle: Arc::downgrade(self),
        }));
        body();
        let new_edges = frame.finish();

        let mut dependencies = self.dependencies.lock();
        for old in dependencies.iter() {
            if !new_edges.iter().any(|new| new.signal_id == old.signal_id) {
                old.subscribers.unsubscribe(self.id);
            }
        }
        *dependencies = new_edges;

        // The body may have disposed this computation (through its parent,
        // say). The edges recorded above must not outlive that.
        if self.is_disposed() {
            for edge in dependencies.iter() {
                edge.subscribers.unsubscribe(self.id);
            }
            dependencies.clear();
        }
    }

    /// Tear the computation down: unsubscribe from every tracked signal,
    /// drop the body, and dispose children and cleanups. Idempotent; a
    /// disposed computation never runs again.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        trace!(computation = ?self.id, "disposing computation");
        *self.body.write() = None;
        let edges = std::mem::take(&mut *self.dependencies.lock());
        for edge in edges.iter() {
            edge.subscribers.unsubscribe(self.id);
        }
        self.scope.dispose();
    }
}

impl std::fmt::Debug for ComputationCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputationCore")
            .field("id", &self.id)
            .field("dependency_count", &self.dependencies.lock().len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Create an autorun: run `f` once immediately, then again whenever any
/// signal it read on its latest run is written.
///
/// `f` receives its previous return value (`None` on the first run). The
/// returned [`StopHandle`] disposes the computation and everything created
/// during its runs; stopping is explicit and idempotent.
///
/// An autorun created while another computation is running becomes a child
/// of that computation and is torn down with it. Every call produces its own
/// independent owner/computation pair.
pub fn create_autorun<T, F>(f: F) -> StopHandle
where
    T: Send + 'static,
    F: Fn(Option<T>) -> T + Send + Sync + 'static,
{
    let previous: Mutex<Option<T>> = Mutex::new(None);
    let body: Body = Arc::new(move || {
        let last = previous.lock().take();
        let next = f(last);
        *previous.lock() = Some(next);
    });

    let owner = Arc::new(Owner::new());
    let computation = ComputationCore::new(body);
    owner.adopt(Owned::Computation(Arc::clone(&computation)));
    adopt_into_parent(&owner);

    computation.run();
    StopHandle::new(owner)
}

/// Attach a fresh root scope to the computation currently running, if any,
/// so that parent disposal cascades into it.
pub(crate) fn adopt_into_parent(owner: &Arc<Owner>) {
    if let Some(active) = context::active() {
        if let Some(parent) = active.handle.upgrade() {
            parent.scope().adopt(Owned::Scope(Arc::clone(owner)));
        }
    }
}
