//! Readiness evaluation.
//!
//! A value is ready when it can be resolved to concrete data right now:
//! reactive inputs must report ready, deferred inputs must have settled, and
//! containers within the depth limit must be ready throughout. Plain data,
//! including null, is always ready here. Rejecting null is the node's job.

use crate::value::Value;

use super::walker::{classify, Shape};

/// Whether `value` is resolvable with `depth_left` levels of descent.
pub fn is_ready(value: &Value, depth_left: usize) -> bool {
    match classify(value, depth_left) {
        Shape::Trackable(trackable) => trackable.is_ready(),
        Shape::Sequence(items) => items.iter().all(|item| is_ready(item, depth_left - 1)),
        Shape::Mapping(entries) => entries.values().all(|item| is_ready(item, depth_left - 1)),
        Shape::Opaque => true,
    }
}

/// Whether `value` currently stands for null.
///
/// Looks through a single trackable reference; containers are never null.
pub(crate) fn resolves_to_null(value: &Value) -> bool {
    match value.as_trackable() {
        Some(trackable) => trackable.current().is_some_and(|current| current.is_null()),
        None => value.is_null(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{Cell, Deferred};
    use indexmap::IndexMap;

    #[test]
    fn scalars_are_ready() {
        assert!(is_ready(&Value::from(5), 1));
        assert!(is_ready(&Value::null(), 1));
    }

    #[test]
    fn reactive_follows_its_flag() {
        let cell = Cell::new();
        let value = Value::from(cell.clone());
        assert!(!is_ready(&value, 1));

        cell.changed("x");
        assert!(is_ready(&value, 1));
    }

    #[test]
    fn deferred_is_ready_once_settled() {
        let deferred = Deferred::new();
        let value = Value::from(deferred.clone());
        assert!(!is_ready(&value, 0));

        deferred.settle(1).unwrap();
        assert!(is_ready(&value, 0));
    }

    #[test]
    fn sequence_requires_every_element() {
        let a = Cell::with_value(1);
        let b = Cell::new();
        let value = Value::Sequence(vec![Value::from(a), Value::from(b.clone())]);
        assert!(!is_ready(&value, 1));

        b.changed(2);
        assert!(is_ready(&value, 1));
    }

    #[test]
    fn sequence_beyond_depth_is_trivially_ready() {
        let value = Value::Sequence(vec![Value::from(Cell::new())]);
        assert!(is_ready(&value, 0));
    }

    #[test]
    fn nested_inputs_only_count_within_depth() {
        let inner = Cell::new();
        let value = Value::Sequence(vec![Value::Sequence(vec![Value::from(inner.clone())])]);

        assert!(is_ready(&value, 1));
        assert!(!is_ready(&value, 2));

        inner.changed(0);
        assert!(is_ready(&value, 2));
    }

    #[test]
    fn mapping_requires_every_value() {
        let cell = Cell::new();
        let mut entries = IndexMap::new();
        entries.insert("n".to_string(), Value::from(1));
        entries.insert("c".to_string(), Value::from(cell.clone()));
        let value = Value::Mapping(entries);

        assert!(!is_ready(&value, 1));
        cell.changed(true);
        assert!(is_ready(&value, 1));
    }

    #[test]
    fn null_detection_looks_through_trackables() {
        assert!(resolves_to_null(&Value::null()));
        assert!(resolves_to_null(&Value::from(Cell::with_value(Value::null()))));
        assert!(!resolves_to_null(&Value::from(Cell::new())));
        assert!(!resolves_to_null(&Value::Sequence(vec![Value::null()])));
    }
}
