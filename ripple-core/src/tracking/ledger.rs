//! Subscription ledger.
//!
//! The ledger records one handle per registration made while a node is
//! activated. It is a FIFO queue: the detach pass walks inputs in the same
//! order as the attach pass and takes handles from the front, so the n-th
//! registration made is the n-th one cancelled.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::reactive::SubscriptionId;

/// Ordered queue of subscription handles.
#[derive(Debug, Default)]
pub struct Ledger {
    handles: VecDeque<SubscriptionId>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a handle at the back.
    pub fn push(&mut self, id: SubscriptionId) {
        self.handles.push_back(id);
    }

    /// Take the oldest handle.
    pub fn take(&mut self) -> Option<SubscriptionId> {
        self.handles.pop_front()
    }

    /// Number of handles still recorded.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether every handle has been taken.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Check that a detach pass consumed every handle.
    pub fn ensure_drained(&self) -> Result<()> {
        if self.handles.is_empty() {
            Ok(())
        } else {
            Err(Error::LedgerImbalance {
                remaining: self.handles.len(),
            })
        }
    }
}
