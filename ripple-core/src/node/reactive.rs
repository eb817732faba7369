//! Reactive Computation Node
//!
//! A `ReactiveNode` recomputes whenever any of its inputs changes, provided
//! every argument is ready at that moment.
//!
//! # How Nodes Work
//!
//! 1. A node is built inert from an argument structure, a dependency set and
//!    a computation callback.
//!
//! 2. `initialise` subscribes one shared poll callback to every dependency,
//!    then to every input found in the arguments. Each registration's handle
//!    goes into the node's ledger. Notifications delivered while subscribing
//!    (an input that is already ready) are held back and folded into a
//!    single poll once every input is subscribed. If nothing at all was
//!    subscribed, the node also polls once, since no notification would
//!    ever arrive.
//!
//! 3. A poll cycle checks that every top-level argument is ready. If so, the
//!    arguments are resolved and handed to the callback. If not, the node's
//!    published value is reset.
//!
//! 4. `finalise` walks dependencies and arguments in the same order and
//!    cancels every registration, draining the ledger.
//!
//! # Arguments and Dependencies
//!
//! Arguments are resolved and passed to the callback. Dependencies only
//! trigger poll cycles: their readiness is not checked and their values are
//! not passed on.
//!
//! # Publishing
//!
//! Every node owns an output `Cell`, handed to the callback on each cycle.
//! Without a callback the node publishes its resolved arguments as a
//! sequence, acting as a merge point. Because the node is itself
//! `Observable`, it can be an input to other nodes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::reactive::{Cell, Notify, Observable, SubscriptionId};
use crate::tracking::{
    attach, attach_all, detach, detach_all, is_ready, resolve, resolves_to_null, Ledger,
};
use crate::value::{Trackable, Value};

use super::config::NodeConfig;
use super::id::NodeId;

/// A computation callback: resolved arguments plus the node's output cell.
pub type Compute = Arc<dyn Fn(Vec<Value>, &Cell) + Send + Sync>;

/// Where a node is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, not subscribed to anything.
    Inert,
    /// `initialise` is subscribing; poll cycles are deferred until it ends.
    Initialising,
    /// Subscribed; poll cycles run on input changes.
    Active,
    /// Unsubscribed for good. A finalised node cannot be reused.
    Finalised,
}

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Every argument was ready and the callback ran.
    Computed,
    /// Some argument was not ready; the published value was reset.
    Reset,
    /// The node is not active, so nothing happened.
    Inactive,
}

struct NodeInner {
    id: NodeId,
    args: Vec<Value>,
    deps: Vec<Trackable>,
    compute: Compute,
    config: NodeConfig,
    output: Cell,
    ledger: Mutex<Ledger>,
    lifecycle: Mutex<Lifecycle>,
    poll_count: AtomicUsize,
    compute_count: AtomicUsize,
    /// Set when a notification arrives while subscribing.
    deferred_poll: AtomicBool,
}

impl NodeInner {
    /// Build the callback every input is subscribed with.
    ///
    /// Holds the node weakly so inputs never keep it alive.
    fn poll_callback(self: &Arc<Self>) -> Notify {
        let weak = Arc::downgrade(self);
        Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Err(err) = inner.poll() {
                    tracing::error!(node = %inner.id, error = %err, "poll cycle aborted");
                }
            }
        })
    }

    fn admits(&self, arg: &Value) -> bool {
        is_ready(arg, self.config.resolve_depth)
            && (self.config.may_be_null || !resolves_to_null(arg))
    }

    fn poll(&self) -> Result<PollOutcome> {
        match *self.lifecycle.lock() {
            Lifecycle::Active => {}
            Lifecycle::Initialising => {
                self.deferred_poll.store(true, Ordering::Relaxed);
                return Ok(PollOutcome::Inactive);
            }
            Lifecycle::Inert | Lifecycle::Finalised => return Ok(PollOutcome::Inactive),
        }
        self.poll_count.fetch_add(1, Ordering::Relaxed);

        if !self.args.iter().all(|arg| self.admits(arg)) {
            tracing::trace!(node = %self.id, "inputs not ready, resetting");
            self.output.reset();
            return Ok(PollOutcome::Reset);
        }

        let depth = self.config.resolve_depth;
        let resolved = self
            .args
            .iter()
            .map(|arg| resolve(arg, depth))
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!(node = %self.id, arguments = resolved.len(), "computing");
        self.compute_count.fetch_add(1, Ordering::Relaxed);
        (self.compute)(resolved, &self.output);
        Ok(PollOutcome::Computed)
    }
}

/// A value computed from reactive and deferred inputs.
///
/// Clones share the same node.
#[derive(Clone)]
pub struct ReactiveNode {
    inner: Arc<NodeInner>,
}

impl ReactiveNode {
    /// Create an inert node with the default configuration.
    pub fn new<F>(args: Vec<Value>, deps: Vec<Trackable>, compute: F) -> Self
    where
        F: Fn(Vec<Value>, &Cell) + Send + Sync + 'static,
    {
        let compute: Compute = Arc::new(compute);
        Self::with_config(args, deps, Some(compute), NodeConfig::default())
    }

    /// Create an inert node that publishes its resolved arguments.
    pub fn merge(args: Vec<Value>, deps: Vec<Trackable>) -> Self {
        Self::with_config(args, deps, None, NodeConfig::default())
    }

    /// Create an inert node.
    ///
    /// Without a callback the node publishes `Value::Sequence` of its
    /// resolved arguments into its own output.
    pub fn with_config(
        args: Vec<Value>,
        deps: Vec<Trackable>,
        compute: Option<Compute>,
        config: NodeConfig,
    ) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                id: NodeId::new(),
                args,
                deps,
                compute: compute.unwrap_or_else(publish_arguments),
                config,
                output: Cell::with_null_policy(config.may_be_null),
                ledger: Mutex::new(Ledger::new()),
                lifecycle: Mutex::new(Lifecycle::Inert),
                poll_count: AtomicUsize::new(0),
                compute_count: AtomicUsize::new(0),
                deferred_poll: AtomicBool::new(false),
            }),
        }
    }

    /// Get the node's unique ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// The cell this node publishes into.
    pub fn output(&self) -> &Cell {
        &self.inner.output
    }

    /// The node's configuration.
    pub fn config(&self) -> NodeConfig {
        self.inner.config
    }

    /// The argument structure.
    pub fn args(&self) -> &[Value] {
        &self.inner.args
    }

    /// The dependency set.
    pub fn dependencies(&self) -> &[Trackable] {
        &self.inner.deps
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        *self.inner.lifecycle.lock()
    }

    /// Whether the node is subscribed to its inputs.
    pub fn is_active(&self) -> bool {
        self.lifecycle() == Lifecycle::Active
    }

    /// Number of poll cycles run while active.
    pub fn poll_count(&self) -> usize {
        self.inner.poll_count.load(Ordering::Relaxed)
    }

    /// Number of times the callback was invoked.
    pub fn compute_count(&self) -> usize {
        self.inner.compute_count.load(Ordering::Relaxed)
    }

    /// Number of registrations currently recorded.
    pub fn ledger_len(&self) -> usize {
        self.inner.ledger.lock().len()
    }

    /// Subscribe to every input.
    ///
    /// Dependencies are subscribed first, then inputs found in the arguments
    /// depth first. One poll cycle runs before this returns if any input
    /// notified while being subscribed, or if there are no dependencies and
    /// no inputs were found. The callback therefore runs at most once here,
    /// however many inputs are already ready.
    pub fn initialise(&self) -> Result<()> {
        let inner = &self.inner;
        {
            let mut lifecycle = inner.lifecycle.lock();
            match *lifecycle {
                Lifecycle::Active | Lifecycle::Initialising => {
                    return Err(Error::AlreadyActive(inner.id));
                }
                Lifecycle::Finalised => return Err(Error::Finalised(inner.id)),
                Lifecycle::Inert => *lifecycle = Lifecycle::Initialising,
            }
        }

        let poll = inner.poll_callback();
        let depth = inner.config.resolve_depth;
        let mut ledger = Ledger::new();

        for dep in &inner.deps {
            attach(dep, &poll, &mut ledger);
        }
        let mut attached = 0;
        for arg in &inner.args {
            if attach_all(arg, &poll, &mut ledger, depth) {
                attached += 1;
            }
        }

        let handles = ledger.len();
        let notified = {
            let mut lifecycle = inner.lifecycle.lock();
            *inner.ledger.lock() = ledger;
            *lifecycle = Lifecycle::Active;
            inner.deferred_poll.swap(false, Ordering::Relaxed)
        };
        tracing::debug!(
            node = %inner.id,
            handles,
            attached,
            dependencies = inner.deps.len(),
            notified,
            "node initialised"
        );

        if notified || (attached == 0 && inner.deps.is_empty()) {
            inner.poll()?;
        }
        Ok(())
    }

    /// Cancel every registration made by `initialise`.
    ///
    /// Handles are consumed in the order they were recorded. The node is
    /// finalised even if the ledger turns out to be unbalanced.
    pub fn finalise(&self) -> Result<()> {
        let inner = &self.inner;
        {
            let mut lifecycle = inner.lifecycle.lock();
            if *lifecycle != Lifecycle::Active {
                return Err(Error::NotActive(inner.id));
            }
            *lifecycle = Lifecycle::Finalised;
        }

        let depth = inner.config.resolve_depth;
        let mut ledger = std::mem::take(&mut *inner.ledger.lock());
        let handles = ledger.len();
        let mut missing = 0;

        for dep in &inner.deps {
            if !detach(dep, &mut ledger) {
                missing += 1;
            }
        }
        for arg in &inner.args {
            match detach_all(arg, &mut ledger, depth) {
                Ok(_) => {}
                Err(Error::LedgerExhausted { missing: more }) => missing += more,
                Err(err) => return Err(err),
            }
        }

        if missing > 0 {
            tracing::error!(node = %inner.id, missing, "ledger exhausted during finalise");
            return Err(Error::LedgerExhausted { missing });
        }
        if let Err(err) = ledger.ensure_drained() {
            tracing::error!(node = %inner.id, error = %err, "ledger not drained by finalise");
            return Err(err);
        }

        tracing::debug!(node = %inner.id, handles, "node finalised");
        Ok(())
    }

    /// Run one poll cycle now.
    ///
    /// Cycles normally run on input notifications; this is the same cycle,
    /// with the error returned instead of logged.
    pub fn poll(&self) -> Result<PollOutcome> {
        self.inner.poll()
    }

    /// Initialise and return a guard that finalises on drop.
    pub fn activate(&self) -> Result<Activation> {
        self.initialise()?;
        Ok(Activation { node: self.clone() })
    }
}

fn publish_arguments() -> Compute {
    Arc::new(|args: Vec<Value>, output: &Cell| output.changed(Value::Sequence(args)))
}

impl Observable for ReactiveNode {
    fn is_ready(&self) -> bool {
        self.inner.output.is_ready()
    }

    fn value(&self) -> Option<Value> {
        self.inner.output.get()
    }

    fn subscribe(&self, notify: Notify) -> SubscriptionId {
        self.inner.output.subscribe(notify)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.output.unsubscribe(id)
    }
}

impl From<ReactiveNode> for Value {
    fn from(node: ReactiveNode) -> Self {
        Value::Reactive(Arc::new(node))
    }
}

impl From<ReactiveNode> for Trackable {
    fn from(node: ReactiveNode) -> Self {
        Trackable::Reactive(Arc::new(node))
    }
}

impl std::fmt::Debug for ReactiveNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveNode")
            .field("id", &self.inner.id)
            .field("lifecycle", &self.lifecycle())
            .field("args", &self.inner.args.len())
            .field("dependencies", &self.inner.deps.len())
            .field("ledger_len", &self.ledger_len())
            .field("compute_count", &self.compute_count())
            .finish()
    }
}

/// Keeps a node active for as long as it lives.
#[must_use = "dropping the activation finalises the node"]
pub struct Activation {
    node: ReactiveNode,
}

impl Activation {
    /// The node this activation keeps alive.
    pub fn node(&self) -> &ReactiveNode {
        &self.node
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        if let Err(err) = self.node.finalise() {
            tracing::error!(node = %self.node.id(), error = %err, "finalise on drop failed");
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
