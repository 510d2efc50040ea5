//! Filament Core
//!
//! This crate provides the reactivity runtime for the Filament framework.
//! It implements:
//!
//! - Reactive variables (observable value cells with capability handles)
//! - Autoruns (computations that re-run when their dependencies change)
//! - A disposal ownership tree with explicit, idempotent teardown
//! - Scoped tracking suppression (`untrack`)
//! - A circular-binding helper for keeping two variables mutually consistent
//!
//! Propagation is synchronous and depth-first: a write re-runs every
//! subscriber, in subscription order, before it returns. There is no task
//! queue, no batching, and no implicit finalization.
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `reactive`: the engine — variables, computations, tracking, ownership
//! - `fields`: an adapter that backs named accessor pairs with variables;
//!   it consumes only `create_variable` and `untrack` and sits entirely
//!   outside the engine
//!
//! # Example
//!
//! ```rust,ignore
//! use filament_core::{create_autorun, create_variable};
//!
//! let count = create_variable(0);
//!
//! let reader = count.reader();
//! let stop = create_autorun(move |_: Option<()>| {
//!     println!("count is {}", reader.get());
//! });
//!
//! count.set(5); // prints: "count is 5"
//! stop.stop();
//! ```

pub mod fields;
pub mod reactive;

pub use reactive::{
    bind_circular, create_autorun, create_variable, on_cleanup, untrack, ReadHandle, StopHandle,
    Variable, WriteHandle,
};
