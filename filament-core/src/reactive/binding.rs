//! Circular (two-way) binding.
//!
//! Keeps two variables mutually consistent: one computation tracks side A
//! and updates side B, the other tracks side B and updates side A. Left
//! alone, those two would re-trigger each other forever; they are
//! coordinated through an explicit two-state machine shared by the pair.
//!
//! Every run of either side advances the machine. A run in the `Suppressed`
//! state is absorbed: this covers the two installation runs and the echo run
//! each side receives right after applying its partner's update. A run in
//! the `Armed` state was caused by an outside write, so it invokes the
//! partner's setter, which propagates synchronously and lands the echo back
//! in `Suppressed`.
//!
//! The handshake is correct for exactly two participants sharing one
//! machine. It is not generalized to rings of three or more mutually bound
//! variables.

use std::sync::Arc;

use parking_lot::Mutex;

use super::computation::{adopt_into_parent, Body, ComputationCore};
use super::owner::{Owned, Owner, StopHandle};

/// Handshake state of one binding pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingPhase {
    /// The next run is absorbed without touching the partner.
    Suppressed,
    /// The next run came from an outside write; update the partner.
    Armed,
}

/// Two-state machine owned by a binding; advanced on every run of either
/// side, alternating.
struct BindingState {
    phase: Mutex<BindingPhase>,
}

impl BindingState {
    fn new() -> Self {
        Self {
            phase: Mutex::new(BindingPhase::Suppressed),
        }
    }

    /// Flip the phase; `true` means the partner must be updated.
    fn advance(&self) -> bool {
        let mut phase = self.phase.lock();
        match *phase {
            BindingPhase::Suppressed => {
                *phase = BindingPhase::Armed;
                false
            }
            BindingPhase::Armed => {
                *phase = BindingPhase::Suppressed;
                true
            }
        }
    }
}

/// Bind two variables so a write to either updates the other.
///
/// `get_a` and `get_b` perform tracked reads of the two sides; `set_a`
/// derives and writes side A from side B, `set_b` the reverse. Installing
/// the binding runs both sides once and aligns side A from side B before
/// returning. The returned [`StopHandle`] disposes both internal
/// computations; like every stop handle it is explicit and idempotent.
///
/// ```rust,ignore
/// let number = create_variable(0);
/// let double = create_variable(0);
///
/// let number_r = number.reader();
/// let double_r = double.reader();
/// let stop = bind_circular(
///     { let r = number.reader(); move || { r.get(); } },
///     { let (r, w) = (double_r.clone(), number.writer()); move || w.set(r.get() / 2) },
///     { let r = double.reader(); move || { r.get(); } },
///     { let (r, w) = (number_r.clone(), double.writer()); move || w.set(r.get() * 2) },
/// );
///
/// number.set(2); // double becomes 4
/// double.set(2); // number becomes 1
/// stop.stop();
/// ```
pub fn bind_circular<GA, SA, GB, SB>(get_a: GA, set_a: SA, get_b: GB, set_b: SB) -> StopHandle
where
    GA: Fn() + Send + Sync + 'static,
    SA: Fn() + Send + Sync + 'static,
    GB: Fn() + Send + Sync + 'static,
    SB: Fn() + Send + Sync + 'static,
{
    let state = Arc::new(BindingState::new());
    let owner = Arc::new(Owner::new());

    let forward: Body = {
        let state = Arc::clone(&state);
        Arc::new(move || {
            get_a();
            if state.advance() {
                set_b();
            }
        })
    };
    let backward: Body = {
        let state = Arc::clone(&state);
        Arc::new(move || {
            get_b();
            if state.advance() {
                set_a();
            }
        })
    };

    let side_a = ComputationCore::new(forward);
    owner.adopt(Owned::Computation(Arc::clone(&side_a)));
    let side_b = ComputationCore::new(backward);
    owner.adopt(Owned::Computation(Arc::clone(&side_b)));
    adopt_into_parent(&owner);

    // Installation: side A's run is absorbed; side B's run then aligns side
    // A through `set_a`, whose propagation settles before this returns.
    side_a.run();
    side_b.run();

    StopHandle::new(owner)
}
