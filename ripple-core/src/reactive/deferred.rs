//! Deferred values.
//!
//! A `Deferred` is a single-resolution future. It starts unsettled, is
//! settled exactly once with a `Value`, and from then on exposes that value.
//! Observers registered before settlement are invoked once, at settlement;
//! observers registered afterwards are invoked immediately.
//!
//! Unlike a reactive value, a deferred never changes after it settles, so an
//! observer fires at most once. Pending observers can still be cancelled,
//! which is how a finalised computation node stops listening.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::value::Value;

use super::subscriber::{Notify, SubscriptionId};

struct DeferredState {
    value: Option<Value>,
    /// Observers waiting for settlement. Most deferreds have one or two.
    observers: SmallVec<[(SubscriptionId, Notify); 2]>,
}

/// A value that becomes known exactly once.
///
/// Clones share the same settlement state.
#[derive(Clone)]
pub struct Deferred {
    state: Arc<Mutex<DeferredState>>,
}

impl Deferred {
    /// Create an unsettled deferred.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DeferredState {
                value: None,
                observers: SmallVec::new(),
            })),
        }
    }

    /// Create a deferred that is already settled with `value`.
    pub fn settled(value: impl Into<Value>) -> Self {
        let deferred = Self::new();
        deferred.state.lock().value = Some(value.into());
        deferred
    }

    /// Settle with `value` and invoke every pending observer.
    ///
    /// A deferred settles once; later calls hand the rejected value back.
    pub fn settle(&self, value: impl Into<Value>) -> Result<(), Value> {
        let value = value.into();
        let observers = {
            let mut state = self.state.lock();
            if state.value.is_some() {
                return Err(value);
            }
            state.value = Some(value);
            std::mem::take(&mut state.observers)
        };

        tracing::trace!(observers = observers.len(), "deferred settled");
        for (_, notify) in observers {
            notify();
        }
        Ok(())
    }

    /// Whether the deferred has settled.
    pub fn is_settled(&self) -> bool {
        self.state.lock().value.is_some()
    }

    /// The settled value, if any.
    pub fn value(&self) -> Option<Value> {
        self.state.lock().value.clone()
    }

    /// Register an observer for settlement.
    ///
    /// If the deferred has already settled the observer runs before this
    /// returns, and the returned id refers to nothing pending.
    pub fn on_settle(&self, notify: Notify) -> SubscriptionId {
        let id = SubscriptionId::new();
        {
            let mut state = self.state.lock();
            if state.value.is_none() {
                state.observers.push((id, notify));
                return id;
            }
        }
        notify();
        id
    }

    /// Cancel a pending observer.
    ///
    /// Returns `false` if the observer already fired or was never registered.
    pub fn cancel(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.observers.len();
        state.observers.retain(|(sub, _)| *sub != id);
        state.observers.len() != before
    }

    /// Number of observers waiting for settlement.
    pub fn pending_observers(&self) -> usize {
        self.state.lock().observers.len()
    }

    /// Whether two handles refer to the same deferred.
    pub fn ptr_eq(&self, other: &Deferred) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for Deferred {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Deferred")
            .field("value", &state.value)
            .field("pending_observers", &state.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    fn counter() -> (Arc<AtomicI32>, Notify) {
        let count = Arc::new(AtomicI32::new(0));
        let count_clone = count.clone();
        let notify: Notify = Arc::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (count, notify)
    }

    #[test]
    fn settles_once() {
        let deferred = Deferred::new();
        assert!(!deferred.is_settled());

        assert!(deferred.settle(1).is_ok());
        assert_eq!(deferred.settle(2), Err(Value::from(2)));
        assert_eq!(deferred.value(), Some(Value::from(1)));
    }

    #[test]
    fn observers_fire_on_settlement() {
        let deferred = Deferred::new();
        let (count, notify) = counter();
        deferred.on_settle(notify);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        deferred.settle("done").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(deferred.pending_observers(), 0);
    }

    #[test]
    fn late_observer_fires_immediately() {
        let deferred = Deferred::settled(3);
        let (count, notify) = counter();
        deferred.on_settle(notify);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelled_observer_does_not_fire() {
        let deferred = Deferred::new();
        let (count, notify) = counter();
        let id = deferred.on_settle(notify);

        assert!(deferred.cancel(id));
        deferred.settle(1).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!deferred.cancel(id));
    }

    #[test]
    fn null_counts_as_settled() {
        let deferred = Deferred::new();
        deferred.settle(Value::null()).unwrap();
        assert!(deferred.is_settled());
    }
}
