//! Value resolution.
//!
//! Resolution replaces every trackable input within the depth limit by its
//! current value, rebuilding containers with the same shape. Opaque values
//! come back as they are.
//!
//! Callers must check readiness first. Resolving something unready, or a
//! ready input with no cached value, is an internal invariant violation and
//! fails the whole resolution.

use crate::error::{Error, Result};
use crate::value::Value;

use super::readiness::is_ready;
use super::walker::{classify, Shape};

/// Resolve `value` with `depth_left` levels of descent.
pub fn resolve(value: &Value, depth_left: usize) -> Result<Value> {
    if !is_ready(value, depth_left) {
        return Err(Error::UnreadyValue);
    }
    resolve_ready(value, depth_left)
}

fn resolve_ready(value: &Value, depth_left: usize) -> Result<Value> {
    match classify(value, depth_left) {
        Shape::Trackable(trackable) => {
            if !trackable.is_ready() {
                return Err(Error::UnreadyValue);
            }
            trackable.current().ok_or(Error::MissingValue {
                kind: trackable.kind(),
            })
        }
        Shape::Sequence(items) => items
            .iter()
            .map(|item| resolve_ready(item, depth_left - 1))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Shape::Mapping(entries) => entries
            .iter()
            .map(|(key, item)| Ok((key.clone(), resolve_ready(item, depth_left - 1)?)))
            .collect::<Result<_>>()
            .map(Value::Mapping),
        Shape::Opaque => Ok(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackableKind;
    use crate::reactive::{Cell, Deferred, Notify, Observable, SubscriptionId};
    use indexmap::IndexMap;
    use std::sync::Arc;

    /// Claims readiness but never holds a value.
    struct Hollow;

    impl Observable for Hollow {
        fn is_ready(&self) -> bool {
            true
        }

        fn value(&self) -> Option<Value> {
            None
        }

        fn subscribe(&self, _notify: Notify) -> SubscriptionId {
            SubscriptionId::new()
        }

        fn unsubscribe(&self, _id: SubscriptionId) -> bool {
            true
        }
    }

    #[test]
    fn scalars_resolve_to_themselves() {
        assert_eq!(resolve(&Value::from(5), 1), Ok(Value::from(5)));
    }

    #[test]
    fn reactive_resolves_to_cached_value() {
        let value = Value::from(Cell::with_value("x"));
        assert_eq!(resolve(&value, 1), Ok(Value::from("x")));
    }

    #[test]
    fn deferred_resolves_to_settled_value() {
        let value = Value::from(Deferred::settled(9));
        assert_eq!(resolve(&value, 1), Ok(Value::from(9)));
    }

    #[test]
    fn nested_shape_is_preserved() {
        let a = Cell::with_value("a");
        let b = Cell::with_value("b");
        let value = Value::Sequence(vec![Value::Sequence(vec![Value::from(a), Value::from(b)])]);

        let resolved = resolve(&value, 2).unwrap();
        assert_eq!(resolved.to_json(), Some(serde_json::json!([["a", "b"]])));
    }

    #[test]
    fn mapping_keys_survive_resolution() {
        let mut entries = IndexMap::new();
        entries.insert("count".to_string(), Value::from(Cell::with_value(3)));
        entries.insert("label".to_string(), Value::from("n"));

        let resolved = resolve(&Value::Mapping(entries), 1).unwrap();
        assert_eq!(
            resolved.to_json(),
            Some(serde_json::json!({"count": 3, "label": "n"}))
        );
    }

    #[test]
    fn containers_beyond_depth_pass_through() {
        let cell = Cell::new();
        let inner = Value::Sequence(vec![Value::from(cell)]);
        let value = Value::Sequence(vec![inner.clone()]);

        // Depth one never looks inside the inner sequence.
        assert_eq!(resolve(&value, 1), Ok(value.clone()));
        assert_eq!(resolve(&inner, 0), Ok(inner));
    }

    #[test]
    fn unready_value_is_an_error() {
        let value = Value::from(Cell::new());
        assert_eq!(resolve(&value, 1), Err(Error::UnreadyValue));
    }

    #[test]
    fn ready_without_value_is_an_error() {
        let value = Value::Reactive(Arc::new(Hollow));
        assert_eq!(
            resolve(&value, 1),
            Err(Error::MissingValue {
                kind: TrackableKind::Reactive
            })
        );
    }
}
