//! One-shot computation node.
//!
//! A `OneShotNode` is a `ReactiveNode` whose callback runs at most once: the
//! first poll cycle that finds every argument ready fires it, and every later
//! cycle is ignored. The node stays subscribed until its owner finalises it.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::reactive::{Cell, Notify, Observable, SubscriptionId};
use crate::value::{Trackable, Value};

use super::config::NodeConfig;
use super::reactive::{Compute, ReactiveNode};

/// A computation node that fires its callback once.
#[derive(Clone)]
pub struct OneShotNode {
    node: ReactiveNode,
    fired: Arc<AtomicBool>,
}

impl OneShotNode {
    /// Create an inert one-shot node with the default configuration.
    pub fn new<F>(args: Vec<Value>, deps: Vec<Trackable>, compute: F) -> Self
    where
        F: Fn(Vec<Value>, &Cell) + Send + Sync + 'static,
    {
        let compute: Compute = Arc::new(compute);
        Self::with_config(args, deps, Some(compute), NodeConfig::default())
    }

    /// Create an inert one-shot node that publishes its first resolution.
    pub fn merge(args: Vec<Value>, deps: Vec<Trackable>) -> Self {
        Self::with_config(args, deps, None, NodeConfig::default())
    }

    /// Create an inert one-shot node.
    pub fn with_config(
        args: Vec<Value>,
        deps: Vec<Trackable>,
        compute: Option<Compute>,
        config: NodeConfig,
    ) -> Self {
        let fired = Arc::new(AtomicBool::new(false));
        let guard = fired.clone();
        let guarded: Compute = Arc::new(move |args: Vec<Value>, output: &Cell| {
            if guard.swap(true, Ordering::SeqCst) {
                return;
            }
            match &compute {
                Some(compute) => compute(args, output),
                None => output.changed(Value::Sequence(args)),
            }
        });

        Self {
            node: ReactiveNode::with_config(args, deps, Some(guarded), config),
            fired,
        }
    }

    /// Whether the callback has run.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// The wrapped node.
    pub fn node(&self) -> &ReactiveNode {
        &self.node
    }
}

impl Deref for OneShotNode {
    type Target = ReactiveNode;

    fn deref(&self) -> &ReactiveNode {
        &self.node
    }
}

impl Observable for OneShotNode {
    fn is_ready(&self) -> bool {
        self.node.is_ready()
    }

    fn value(&self) -> Option<Value> {
        self.node.value()
    }

    fn subscribe(&self, notify: Notify) -> SubscriptionId {
        self.node.subscribe(notify)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.node.unsubscribe(id)
    }
}

impl From<OneShotNode> for Value {
    fn from(node: OneShotNode) -> Self {
        Value::Reactive(Arc::new(node))
    }
}

impl std::fmt::Debug for OneShotNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneShotNode")
            .field("node", &self.node)
            .field("fired", &self.has_fired())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Deferred;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn fires_once_across_changes() {
        let a = Cell::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let node = OneShotNode::new(vec![Value::from(a.clone())], vec![], move |_, _| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        node.initialise().unwrap();
        assert!(!node.has_fired());

        a.changed(1);
        a.changed(2);
        a.reset();
        a.changed(3);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(node.has_fired());
        // Every change still reached the node.
        assert_eq!(node.poll_count(), 4);
    }

    #[test]
    fn merge_publishes_first_resolution_only() {
        let a = Cell::new();
        let node = OneShotNode::merge(vec![Value::from(a.clone())], vec![]);
        node.initialise().unwrap();

        a.changed("first");
        a.changed("second");
        assert_eq!(node.value(), Some(Value::Sequence(vec![Value::from("first")])));
    }

    #[test]
    fn stays_subscribed_after_firing() {
        let deferred = Deferred::new();
        let a = Cell::new();
        let node = OneShotNode::merge(
            vec![Value::from(deferred.clone()), Value::from(a.clone())],
            vec![],
        );
        node.initialise().unwrap();

        a.changed(1);
        deferred.settle(2).unwrap();
        assert!(node.has_fired());
        assert!(node.is_active());
        assert_eq!(a.subscriber_count(), 1);

        node.finalise().unwrap();
        assert_eq!(a.subscriber_count(), 0);
    }

    #[test]
    fn all_scalar_one_shot_fires_on_initialise() {
        let node = OneShotNode::merge(vec![Value::from(7)], vec![]);
        node.initialise().unwrap();
        assert!(node.has_fired());
        assert_eq!(node.value(), Some(Value::Sequence(vec![Value::from(7)])));
    }
}
