//! The reactive value capability set.
//!
//! Anything that can stand in as a reactive input implements `Observable`:
//! it has a readiness flag, an optional cached value, and a way to register
//! and cancel change callbacks. `Cell` is the base implementation; computation
//! nodes implement it by delegating to their output cell, which is what makes
//! nodes composable.

use crate::value::Value;

use super::subscriber::{Notify, SubscriptionId};

/// A trait for values that can be tracked by a computation node.
pub trait Observable: Send + Sync {
    /// Whether the current value can be meaningfully resolved right now.
    fn is_ready(&self) -> bool;

    /// The cached current value, if any.
    fn value(&self) -> Option<Value>;

    /// Register a callback invoked on every change of value or readiness.
    fn subscribe(&self, notify: Notify) -> SubscriptionId;

    /// Cancel a registration. Returns `false` if the handle was unknown.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
