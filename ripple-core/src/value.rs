//! Argument values.
//!
//! `Value` is the closed set of things a computation node can be handed:
//! plain data, references to trackable inputs, and containers of either.
//! Every traversal in the crate (readiness, subscription, resolution)
//! dispatches on these variants.
//!
//! Plain data is carried as `serde_json::Value`. A JSON array or object
//! inside a `Scalar` is opaque: it is never searched for trackable inputs.
//! Only `Sequence` and `Mapping` are structural.

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::TrackableKind;
use crate::reactive::{Cell, Deferred, Notify, Observable, SubscriptionId};

/// An argument, dependency, or resolved value.
#[derive(Clone)]
pub enum Value {
    /// Plain data, passed through unchanged.
    Scalar(serde_json::Value),

    /// A reference to a reactive input.
    Reactive(Arc<dyn Observable>),

    /// A reference to a deferred input.
    Deferred(Deferred),

    /// An ordered sequence of values.
    Sequence(Vec<Value>),

    /// A mapping from keys to values. Iteration follows insertion order.
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// The null scalar.
    pub fn null() -> Self {
        Value::Scalar(serde_json::Value::Null)
    }

    /// Wrap any observable as a reactive reference.
    pub fn reactive(observable: impl Observable + 'static) -> Self {
        Value::Reactive(Arc::new(observable))
    }

    /// Whether this is the null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(serde_json::Value::Null))
    }

    /// Whether this is a reactive or deferred reference.
    pub fn is_trackable(&self) -> bool {
        matches!(self, Value::Reactive(_) | Value::Deferred(_))
    }

    /// Whether this is a `Sequence` or `Mapping`.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// The trackable input this value refers to, if it is one.
    pub fn as_trackable(&self) -> Option<Trackable> {
        match self {
            Value::Reactive(observable) => Some(Trackable::Reactive(Arc::clone(observable))),
            Value::Deferred(deferred) => Some(Trackable::Deferred(deferred.clone())),
            _ => None,
        }
    }

    /// Convert to plain JSON.
    ///
    /// Returns `None` if a trackable reference appears anywhere inside.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Value::Scalar(json) => Some(json.clone()),
            Value::Reactive(_) | Value::Deferred(_) => None,
            Value::Sequence(items) => items
                .iter()
                .map(Value::to_json)
                .collect::<Option<Vec<_>>>()
                .map(serde_json::Value::Array),
            Value::Mapping(entries) => entries
                .iter()
                .map(|(key, value)| value.to_json().map(|json| (key.clone(), json)))
                .collect::<Option<serde_json::Map<_, _>>>()
                .map(serde_json::Value::Object),
        }
    }
}

impl PartialEq for Value {
    /// Trackables compare by identity, data compares structurally.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Reactive(a), Value::Reactive(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Value::Deferred(a), Value::Deferred(b)) => a.ptr_eq(b),
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Scalar(json) => write!(f, "{json}"),
            Value::Reactive(observable) => f
                .debug_struct("Reactive")
                .field("ready", &observable.is_ready())
                .finish(),
            Value::Deferred(deferred) => f
                .debug_struct("Deferred")
                .field("settled", &deferred.is_settled())
                .finish(),
            Value::Sequence(items) => f.debug_list().entries(items).finish(),
            Value::Mapping(entries) => f.debug_map().entries(entries).finish(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::Scalar(json)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(serde_json::Value::from(value))
                }
            }
        )*
    };
}

scalar_from!(bool, i32, i64, u32, u64, f64, &str, String);

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Mapping(entries)
    }
}

impl From<Cell> for Value {
    fn from(cell: Cell) -> Self {
        Value::Reactive(Arc::new(cell))
    }
}

impl From<Deferred> for Value {
    fn from(deferred: Deferred) -> Self {
        Value::Deferred(deferred)
    }
}

impl From<Trackable> for Value {
    fn from(trackable: Trackable) -> Self {
        match trackable {
            Trackable::Reactive(observable) => Value::Reactive(observable),
            Trackable::Deferred(deferred) => Value::Deferred(deferred),
        }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}

/// A reactive or deferred input.
///
/// This is the element type of a node's dependency set, and the form every
/// traversal reduces a trackable `Value` to before subscribing.
#[derive(Clone)]
pub enum Trackable {
    /// A reactive input.
    Reactive(Arc<dyn Observable>),
    /// A deferred input.
    Deferred(Deferred),
}

impl Trackable {
    /// Which kind of input this is.
    pub fn kind(&self) -> TrackableKind {
        match self {
            Trackable::Reactive(_) => TrackableKind::Reactive,
            Trackable::Deferred(_) => TrackableKind::Deferred,
        }
    }

    /// Ready for a reactive input, settled for a deferred one.
    pub fn is_ready(&self) -> bool {
        match self {
            Trackable::Reactive(observable) => observable.is_ready(),
            Trackable::Deferred(deferred) => deferred.is_settled(),
        }
    }

    /// The cached value, if any.
    pub fn current(&self) -> Option<Value> {
        match self {
            Trackable::Reactive(observable) => observable.value(),
            Trackable::Deferred(deferred) => deferred.value(),
        }
    }

    /// Register `notify` for changes (reactive) or settlement (deferred).
    pub fn subscribe(&self, notify: Notify) -> SubscriptionId {
        match self {
            Trackable::Reactive(observable) => observable.subscribe(notify),
            Trackable::Deferred(deferred) => deferred.on_settle(notify),
        }
    }

    /// Cancel a registration made by `subscribe`.
    ///
    /// A deferred observer that already fired is no longer pending, so
    /// cancelling it is not reported as a failure.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        match self {
            Trackable::Reactive(observable) => observable.unsubscribe(id),
            Trackable::Deferred(deferred) => deferred.cancel(id) || deferred.is_settled(),
        }
    }
}

impl From<Cell> for Trackable {
    fn from(cell: Cell) -> Self {
        Trackable::Reactive(Arc::new(cell))
    }
}

impl From<Deferred> for Trackable {
    fn from(deferred: Deferred) -> Self {
        Trackable::Deferred(deferred)
    }
}

impl From<Arc<dyn Observable>> for Trackable {
    fn from(observable: Arc<dyn Observable>) -> Self {
        Trackable::Reactive(observable)
    }
}

impl Debug for Trackable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trackable")
            .field("kind", &self.kind())
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trackables_compare_by_identity() {
        let cell = Cell::with_value(1);
        let a = Value::from(cell.clone());
        let b = Value::from(Cell::with_value(1));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn to_json_rejects_trackables() {
        let plain = Value::Sequence(vec![Value::from(1), Value::from("a")]);
        assert_eq!(plain.to_json(), Some(serde_json::json!([1, "a"])));

        let tracked = Value::Sequence(vec![Value::from(Deferred::new())]);
        assert_eq!(tracked.to_json(), None);
    }

    #[test]
    fn mapping_to_json_keeps_keys() {
        let mut entries = IndexMap::new();
        entries.insert("b".to_string(), Value::from(2));
        entries.insert("a".to_string(), Value::null());

        let json = Value::Mapping(entries).to_json();
        assert_eq!(json, Some(serde_json::json!({"b": 2, "a": null})));
    }

    #[test]
    fn settled_deferred_unsubscribe_is_not_a_failure() {
        let deferred = Deferred::settled(1);
        let trackable = Trackable::from(deferred);
        let id = trackable.subscribe(Arc::new(|| {}));
        assert!(trackable.unsubscribe(id));
    }
}
