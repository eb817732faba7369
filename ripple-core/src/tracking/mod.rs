//! Dependency Tracking
//!
//! This module is the evaluation core behind computation nodes. It answers
//! three questions about an argument structure, each with the same
//! depth-bounded traversal:
//!
//! - Is everything in it ready? (`is_ready`)
//! - Which inputs does it reference? (`attach_all` / `detach_all`)
//! - What does it look like with every input replaced by its value? (`resolve`)
//!
//! # Traversal
//!
//! All passes dispatch through one classification of each value: a
//! trackable input, a container worth descending into, or opaque data. This
//! keeps the attach and detach passes in lockstep, which the FIFO
//! `Ledger` relies on.

mod ledger;
mod readiness;
mod resolver;
mod walker;

pub use ledger::Ledger;
pub use readiness::is_ready;
pub use resolver::resolve;
pub use walker::{attach_all, detach_all};

pub(crate) use readiness::resolves_to_null;
pub(crate) use walker::{attach, detach};
