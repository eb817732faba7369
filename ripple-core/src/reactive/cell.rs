//! Cell Implementation
//!
//! A Cell is the base observable: a slot that is either unset or holds a
//! `Value`, plus an ordered list of change callbacks.
//!
//! # How Cells Work
//!
//! 1. A cell starts unset (not ready) unless created with a value.
//!
//! 2. `changed` stores a new value, marks the cell ready and notifies every
//!    subscriber, in the order they subscribed. Storing a value equal to the
//!    current one is a no-op.
//!
//! 3. `reset` returns a ready cell to the unset state and notifies.
//!
//! 4. Subscribing to a ready cell invokes the new callback once straight
//!    away, so a late subscriber never misses the current value.
//!
//! # Null Handling
//!
//! A cell built with `may_be_null = false` never holds a null scalar:
//! publishing one resets the cell instead.
//!
//! # Reentrancy
//!
//! Callbacks run after every lock is released, against a snapshot of the
//! subscriber list. A callback may therefore read the cell, subscribe, or
//! unsubscribe without deadlocking.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::value::Value;

use super::observable::Observable;
use super::subscriber::{Notify, SubscriptionId};

/// A reactive slot holding an optional `Value`.
///
/// Clones share the same slot and subscriber list.
#[derive(Clone)]
pub struct Cell {
    /// The current value. `None` means not ready.
    value: Arc<RwLock<Option<Value>>>,

    /// Registered change callbacks, in subscription order.
    notifiers: Arc<RwLock<Vec<(SubscriptionId, Notify)>>>,

    /// Whether a null scalar counts as a valid value.
    may_be_null: bool,
}

impl Cell {
    /// Create an unset cell that accepts null values.
    pub fn new() -> Self {
        Self::with_null_policy(true)
    }

    /// Create an unset cell with an explicit null policy.
    pub fn with_null_policy(may_be_null: bool) -> Self {
        Self {
            value: Arc::new(RwLock::new(None)),
            notifiers: Arc::new(RwLock::new(Vec::new())),
            may_be_null,
        }
    }

    /// Create a ready cell holding `value`.
    pub fn with_value(value: impl Into<Value>) -> Self {
        let cell = Self::new();
        *cell.value.write() = Some(value.into());
        cell
    }

    /// Whether the cell currently holds a value.
    pub fn is_ready(&self) -> bool {
        self.value.read().is_some()
    }

    /// Whether this cell accepts null scalars.
    pub fn may_be_null(&self) -> bool {
        self.may_be_null
    }

    /// Get a clone of the current value, if any.
    pub fn get(&self) -> Option<Value> {
        self.value.read().clone()
    }

    /// Publish a new value.
    ///
    /// Notifies subscribers if the cell was unset or the value differs.
    pub fn changed(&self, value: impl Into<Value>) {
        let value = value.into();
        if !self.may_be_null && value.is_null() {
            self.reset();
            return;
        }

        {
            let mut guard = self.value.write();
            if guard.as_ref() == Some(&value) {
                return;
            }
            *guard = Some(value);
        }

        tracing::trace!(subscribers = self.subscriber_count(), "cell changed");
        self.notify_subscribers();
    }

    /// Return the cell to the unset state.
    ///
    /// Notifies subscribers only if the cell was ready.
    pub fn reset(&self) {
        let was_ready = self.value.write().take().is_some();
        if was_ready {
            tracing::trace!(subscribers = self.subscriber_count(), "cell reset");
            self.notify_subscribers();
        }
    }

    /// Register a notification callback.
    ///
    /// The callback will be invoked whenever the value or readiness changes,
    /// and once immediately if the cell is already ready.
    pub fn subscribe(&self, notify: Notify) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.notifiers.write().push((id, Arc::clone(&notify)));
        if self.is_ready() {
            notify();
        }
        id
    }

    /// Remove a registration. Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut notifiers = self.notifiers.write();
        let before = notifiers.len();
        notifiers.retain(|(sub, _)| *sub != id);
        notifiers.len() != before
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.notifiers.read().len()
    }

    fn notify_subscribers(&self) {
        let snapshot: Vec<Notify> = self
            .notifiers
            .read()
            .iter()
            .map(|(_, notify)| Arc::clone(notify))
            .collect();

        for notify in snapshot {
            notify();
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for Cell {
    fn is_ready(&self) -> bool {
        Cell::is_ready(self)
    }

    fn value(&self) -> Option<Value> {
        self.get()
    }

    fn subscribe(&self, notify: Notify) -> SubscriptionId {
        Cell::subscribe(self, notify)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        Cell::unsubscribe(self, id)
    }
}

impl Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("value", &self.get())
            .field("may_be_null", &self.may_be_null)
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
