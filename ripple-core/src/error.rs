//! Error types for the dependency-resolution core.
//!
//! Two families live here. The resolution errors describe violated internal
//! invariants: a readiness check and the resolver disagreed, or an input
//! claimed to be ready without holding a value. Neither is recoverable and
//! neither should be retried. The lifecycle and ledger errors report misuse
//! of `initialise`/`finalise` by the owner of a node.
//!
//! Ordinary unreadiness is not an error. A poll cycle that finds an input
//! unready resets the node's published value and waits.

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::node::NodeId;

/// Which kind of trackable input an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackableKind {
    /// A reactive value (anything implementing `Observable`).
    Reactive,
    /// A single-resolution deferred value.
    Deferred,
}

impl Display for TrackableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackableKind::Reactive => f.write_str("reactive value"),
            TrackableKind::Deferred => f.write_str("deferred value"),
        }
    }
}

/// Errors raised by the resolution engine and the node lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The resolver was handed a value that is not currently ready.
    #[error("internal error: unready value being resolved")]
    UnreadyValue,

    /// A trackable reported ready (or settled) but exposes no cached value.
    #[error("internal error: ready {kind} has no cached value")]
    MissingValue { kind: TrackableKind },

    /// `initialise` was called on a node that is already active.
    #[error("node {0} is already active")]
    AlreadyActive(NodeId),

    /// `initialise` was called on a node that has been finalised.
    #[error("node {0} has been finalised and cannot be reused")]
    Finalised(NodeId),

    /// `finalise` was called on a node that is not active.
    #[error("node {0} is not active")]
    NotActive(NodeId),

    /// The detach pass asked for more handles than the attach pass recorded.
    #[error("subscription ledger exhausted: {missing} registrations had no handle")]
    LedgerExhausted { missing: usize },

    /// Handles were left in the ledger after the detach pass.
    #[error("subscription ledger out of balance: {remaining} handles left after finalise")]
    LedgerImbalance { remaining: usize },
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_trackable_kind() {
        let err = Error::MissingValue {
            kind: TrackableKind::Deferred,
        };
        assert_eq!(
            err.to_string(),
            "internal error: ready deferred value has no cached value"
        );
    }

    #[test]
    fn lifecycle_messages_include_node_id() {
        let id = NodeId::from(7);
        assert_eq!(Error::NotActive(id).to_string(), "node #7 is not active");
    }
}
