//! Reactive primitives.
//!
//! This module implements the reactivity engine: reactive variables,
//! autoruns, disposal ownership, scoped tracking suppression, and the
//! circular-binding helper.
//!
//! # Concepts
//!
//! ## Variables
//!
//! A [`Variable`] is a container for mutable state. When its value is read
//! inside a running computation, the variable registers that computation as
//! a subscriber. When the value is written, all subscribers re-run,
//! synchronously and in subscription order.
//!
//! ## Autoruns
//!
//! [`create_autorun`] wraps a function in a computation that runs once
//! immediately and again whenever any variable it read on its latest run is
//! written. Dependencies are re-tracked from scratch on every run, so a
//! conditional branch that stops reading a variable stops reacting to it.
//!
//! ## Ownership
//!
//! Each autorun owns whatever it creates while running: nested autoruns and
//! cleanups registered with [`on_cleanup`]. Stopping the returned
//! [`StopHandle`] cascades through all of it. Teardown is always explicit;
//! nothing is disposed by `Drop`.
//!
//! # Implementation notes
//!
//! Dependency detection uses a thread-local tracking stack: running a
//! computation pushes a frame, and every variable read while the frame is on
//! top records an edge. This "automatic dependency tracking" approach is the
//! one used by SolidJS, Vue 3, and Leptos.

mod binding;
mod computation;
mod context;
mod owner;
mod signal;
mod subscriber;
mod variable;

pub use binding::bind_circular;
pub use computation::create_autorun;
pub use context::untrack;
pub use owner::{on_cleanup, StopHandle};
pub use subscriber::SubscriberId;
pub use variable::{create_variable, ReadHandle, Variable, WriteHandle};
