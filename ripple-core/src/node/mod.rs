//! Computation Nodes
//!
//! A computation node derives a value from a set of inputs and recomputes
//! whenever any of them changes or becomes known.
//!
//! # Overview
//!
//! - `ReactiveNode` runs its callback on every poll cycle that finds all of
//!   its arguments ready.
//! - `OneShotNode` runs its callback on the first such cycle only.
//!
//! Both start inert. `initialise` subscribes to the inputs and `finalise`
//! cancels exactly those subscriptions; the two must be paired one to one.

mod config;
mod id;
mod one_shot;
mod reactive;

pub use config::{NodeConfig, DEFAULT_RESOLVE_DEPTH};
pub use id::NodeId;
pub use one_shot::OneShotNode;
pub use reactive::{Activation, Compute, Lifecycle, PollOutcome, ReactiveNode};
