//! Reactive Inputs
//!
//! This module holds the inputs a computation node can track.
//!
//! # Concepts
//!
//! ## Observables
//!
//! An `Observable` is anything with a readiness flag, an optional cached
//! value, and change subscriptions. `Cell` is the base implementation: a
//! slot that publishes values and notifies subscribers when they change.
//!
//! ## Deferred Values
//!
//! A `Deferred` settles exactly once. Until then it is not ready; afterwards
//! it holds its value forever.
//!
//! # Implementation Notes
//!
//! Dependencies are declared explicitly when a node is built rather than
//! discovered by reading values inside a tracking context. Each registration
//! returns a `SubscriptionId`, and the node keeps those ids in a ledger so it
//! can cancel exactly what it registered.

mod cell;
mod deferred;
mod observable;
mod subscriber;

pub use cell::Cell;
pub use deferred::Deferred;
pub use observable::Observable;
pub use subscriber::{Notify, SubscriptionId};
