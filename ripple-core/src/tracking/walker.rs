//! Structure walker.
//!
//! Every pass over an argument structure (readiness, attach, detach,
//! resolution) goes through `classify`, so they agree on which containers
//! are descended into and in which order children are visited.
//!
//! # Descending Rule
//!
//! A `Sequence` or `Mapping` is descended into only while depth remains and
//! only if it is worth it:
//!
//! - with one level left, a direct child must be a trackable input;
//! - with more levels left, a direct child must be a trackable input or a
//!   container.
//!
//! Anything else is opaque and passed through untouched.
//!
//! # Order
//!
//! Sequences are visited front to back and mappings in insertion order.
//! Attach and detach share `for_each_trackable`, so handles come off the
//! ledger in exactly the order they went on.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::reactive::Notify;
use crate::value::{Trackable, Value};

use super::ledger::Ledger;

/// How a traversal should treat one value at a given remaining depth.
pub(crate) enum Shape<'a> {
    /// A reactive or deferred input.
    Trackable(Trackable),
    /// A sequence worth descending into.
    Sequence(&'a [Value]),
    /// A mapping worth descending into.
    Mapping(&'a IndexMap<String, Value>),
    /// Plain data, or a container not worth descending into.
    Opaque,
}

/// Classify `value` for a traversal with `depth_left` levels remaining.
pub(crate) fn classify(value: &Value, depth_left: usize) -> Shape<'_> {
    match value {
        Value::Reactive(observable) => Shape::Trackable(Trackable::Reactive(Arc::clone(observable))),
        Value::Deferred(deferred) => Shape::Trackable(Trackable::Deferred(deferred.clone())),
        Value::Sequence(items) if worth_descending(items.iter(), depth_left) => {
            Shape::Sequence(items)
        }
        Value::Mapping(entries) if worth_descending(entries.values(), depth_left) => {
            Shape::Mapping(entries)
        }
        _ => Shape::Opaque,
    }
}

fn worth_descending<'a>(mut children: impl Iterator<Item = &'a Value>, depth_left: usize) -> bool {
    match depth_left {
        0 => false,
        1 => children.any(Value::is_trackable),
        _ => children.any(|child| child.is_trackable() || child.is_container()),
    }
}

/// Visit every trackable input reachable within `depth_left` levels.
///
/// Returns whether anything was visited.
pub(crate) fn for_each_trackable(
    value: &Value,
    depth_left: usize,
    visit: &mut dyn FnMut(&Trackable),
) -> bool {
    match classify(value, depth_left) {
        Shape::Trackable(trackable) => {
            visit(&trackable);
            true
        }
        Shape::Sequence(items) => {
            let mut found = false;
            for item in items {
                found |= for_each_trackable(item, depth_left - 1, visit);
            }
            found
        }
        Shape::Mapping(entries) => {
            let mut found = false;
            for item in entries.values() {
                found |= for_each_trackable(item, depth_left - 1, visit);
            }
            found
        }
        Shape::Opaque => false,
    }
}

/// Subscribe `poll` to every trackable in `value`, recording handles.
///
/// Returns whether this subtree attached anything.
pub fn attach_all(value: &Value, poll: &Notify, ledger: &mut Ledger, depth_left: usize) -> bool {
    for_each_trackable(value, depth_left, &mut |trackable| {
        attach(trackable, poll, ledger);
    })
}

/// Undo `attach_all` for `value`, taking handles from the front of `ledger`.
///
/// Returns whether this subtree detached anything.
pub fn detach_all(value: &Value, ledger: &mut Ledger, depth_left: usize) -> Result<bool> {
    let mut missing = 0;
    let found = for_each_trackable(value, depth_left, &mut |trackable| {
        if !detach(trackable, ledger) {
            missing += 1;
        }
    });

    if missing > 0 {
        return Err(Error::LedgerExhausted { missing });
    }
    Ok(found)
}

/// Subscribe `poll` to a single trackable and record the handle.
pub(crate) fn attach(trackable: &Trackable, poll: &Notify, ledger: &mut Ledger) {
    ledger.push(trackable.subscribe(Arc::clone(poll)));
}

/// Cancel the oldest recorded handle against `trackable`.
///
/// Returns `false` if the ledger had no handle left.
pub(crate) fn detach(trackable: &Trackable, ledger: &mut Ledger) -> bool {
    match ledger.take() {
        Some(id) => {
            if !trackable.unsubscribe(id) {
                tracing::warn!(subscription = %id, kind = %trackable.kind(), "unsubscribed unknown handle");
            }
            true
        }
        None => false,
    }
}
