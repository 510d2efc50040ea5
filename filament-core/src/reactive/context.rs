//! Tracking context.
//!
//! The tracking context records which computation is currently running so
//! that signal reads can be attributed to it. It is a thread-local stack:
//! running a computation pushes a frame, nested computations push their own
//! frames on top, and [`untrack`] pushes a sentinel frame that swallows
//! nothing but attribution.
//!
//! Each frame also accumulates the reads made while it was on top. When a
//! computation's run completes, it takes that read set and diffs it against
//! the previous run's edges. Because every run owns exactly one frame, a
//! reentrant write that re-runs other computations mid-body cannot corrupt
//! the read set being built here.

use std::cell::RefCell;
use std::sync::{Arc, Weak};

use smallvec::SmallVec;

use super::computation::ComputationCore;
use super::subscriber::{SubscriberId, SubscriberList};

thread_local! {
    static TRACKING_STACK: RefCell<Vec<Frame>> = RefCell::new(Vec::new());
}

/// One signal read recorded during a computation's run.
pub(crate) struct TrackedRead {
    pub signal_id: u64,
    pub subscribers: Arc<SubscriberList>,
}

/// The edges collected by a single run. Most computations read only a few
/// signals, so the list lives inline.
pub(crate) type ReadSet = SmallVec<[TrackedRead; 4]>;

/// Handle to the computation a frame attributes reads to.
#[derive(Clone)]
pub(crate) struct ActiveComputation {
    pub id: SubscriberId,
    pub handle: Weak<ComputationCore>,
}

struct Frame {
    /// `None` is the untrack sentinel: reads inside register nowhere.
    active: Option<ActiveComputation>,
    reads: ReadSet,
}

/// Guard for one tracking frame.
///
/// The frame is popped either by [`TrackingFrame::finish`], which hands back
/// the recorded reads, or by `Drop` if the body panicked before finishing.
pub(crate) struct TrackingFrame {
    finished: bool,
}

impl TrackingFrame {
    /// Push a new frame. `None` suppresses tracking for the frame's extent.
    pub fn enter(active: Option<ActiveComputation>) -> Self {
        TRACKING_STACK.with(|stack| {
            stack.borrow_mut().push(Frame {
                active,
                reads: SmallVec::new(),
            });
        });
        Self { finished: false }
    }

    /// Pop the frame and hand back everything read while it was on top.
    pub fn finish(mut self) -> ReadSet {
        self.finished = true;
        TRACKING_STACK.with(|stack| {
            stack
                .borrow_mut()
                .pop()
                .map(|frame| frame.reads)
                .unwrap_or_default()
        })
    }
}

impl Drop for TrackingFrame {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        TRACKING_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// The computation reads should currently be attributed to, if any.
///
/// Returns `None` outside any computation and inside [`untrack`].
pub(crate) fn active() -> Option<ActiveComputation> {
    TRACKING_STACK.with(|stack| stack.borrow().last().and_then(|frame| frame.active.clone()))
}

/// Record a signal read in the innermost frame, once per signal per frame.
pub(crate) fn record_read(signal_id: u64, subscribers: &Arc<SubscriberList>) {
    TRACKING_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let Some(frame) = stack.last_mut() else {
            return;
        };
        if frame.active.is_none() {
            return;
        }
        if frame.reads.iter().any(|read| read.signal_id == signal_id) {
            return;
        }
        frame.reads.push(TrackedRead {
            signal_id,
            subscribers: Arc::clone(subscribers),
        });
    });
}

/// Execute `f` without registering any dependency edges for the caller's
/// enclosing computation.
///
/// Side effects of `f` (including writes and the propagation they trigger)
/// still occur normally; only read attribution is suppressed. Returns the
/// result of `f`.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    let _frame = TrackingFrame::enter(None);
    f()
}
