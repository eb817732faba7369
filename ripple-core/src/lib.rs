//! Ripple Core
//!
//! This crate provides dependency-tracking computation nodes: values derived
//! from a set of reactive and deferred inputs that recompute whenever an
//! input changes or becomes known.
//!
//! It implements:
//!
//! - A base observable (`Cell`) and a single-resolution value (`Deferred`)
//! - Readiness checks, subscription and resolution over nested arguments
//! - Reactive and one-shot computation nodes
//!
//! Everything runs synchronously on the caller's thread: a change
//! notification triggers an immediate poll cycle, with no batching.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: Inputs a node can track
//! - `value`: The tagged argument type every traversal dispatches on
//! - `tracking`: Readiness, structure walking, subscription ledger, resolution
//! - `node`: Reactive and one-shot computation nodes
//!
//! # Example
//!
//! ```rust
//! use ripple_core::{Cell, ReactiveNode, Value};
//!
//! // Merge a reactive input and a constant into one published sequence
//! let name = Cell::new();
//! let merged = ReactiveNode::merge(vec![Value::from(name.clone()), Value::from(5)], vec![]);
//! merged.initialise().unwrap();
//! assert!(merged.output().get().is_none());
//!
//! // The node recomputes as soon as the input becomes ready
//! name.changed("x");
//! let published = merged.output().get().and_then(|value| value.to_json());
//! assert_eq!(published, Some(serde_json::json!(["x", 5])));
//! ```

pub mod error;
pub mod node;
pub mod reactive;
pub mod tracking;
pub mod value;

pub use error::{Error, Result, TrackableKind};
pub use node::{
    Activation, Compute, Lifecycle, NodeConfig, NodeId, OneShotNode, PollOutcome, ReactiveNode,
};
pub use reactive::{Cell, Deferred, Notify, Observable, SubscriptionId};
pub use value::{Trackable, Value};
