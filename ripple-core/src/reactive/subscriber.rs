//! Subscription handles for the reactive system.
//!
//! Every registration of a change callback with a trackable input yields a
//! `SubscriptionId`. The id is the only thing needed to cancel that
//! registration later, which is what lets a computation node keep a flat
//! ledger of handles instead of references back into its inputs.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A change callback registered with a trackable input.
///
/// Callbacks are reference counted so one poll callback can be shared by
/// every input a node subscribes to.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

/// Opaque handle for one registration with one input.
///
/// Ids are unique across the process, so a handle can never cancel another
/// subscriber's registration by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Generate a new unique subscription ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}
