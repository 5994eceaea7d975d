//! Topic-keyed broadcast channel for Horizon Grid.
//!
//! A [`Broadcaster`] lets components that hold no reference to each other
//! exchange notifications. Producers publish a payload to a topic; every
//! handler subscribed to that topic at that moment is invoked synchronously,
//! on the publishing thread, in the order the handlers were registered.
//!
//! # Key Types
//!
//! - [`Broadcaster<K, P>`] - The registry, keyed by topic `K`, carrying payload `P`
//! - [`SubscriptionId`] - Identifies one registration, returned by [`Broadcaster::subscribe`]
//! - [`SubscriptionGuard`] - RAII registration that unsubscribes when dropped
//!
//! # Degenerate Inputs
//!
//! Nothing here fails. Publishing to a topic nobody listens on, unsubscribing
//! twice, or unsubscribing an id under the wrong topic are all no-ops.
//!
//! # Re-entrancy
//!
//! The registry lock is released before handlers run, so a handler may
//! subscribe, unsubscribe or publish. A handler removed while a publish is in
//! flight is not invoked for the remainder of that publish; a handler added
//! during a publish first sees the next one.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::Broadcaster;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let broadcaster = Broadcaster::<&'static str, usize>::new();
//! let total = Arc::new(AtomicUsize::new(0));
//!
//! let total_clone = total.clone();
//! let id = broadcaster.subscribe("row:0", move |&n| {
//!     total_clone.fetch_add(n, Ordering::SeqCst);
//! });
//!
//! broadcaster.publish(&"row:0", 5);
//! broadcaster.publish(&"row:1", 7); // nobody listens, nothing happens
//! assert!(broadcaster.unsubscribe(&"row:0", id));
//! broadcaster.publish(&"row:0", 11);
//!
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for one topic subscription.
    ///
    /// Returned by [`Broadcaster::subscribe`] and consumed by
    /// [`Broadcaster::unsubscribe`]. Ids are never reused for a different
    /// registration, so a stale id can never remove someone else's handler.
    pub struct SubscriptionId;
}

type Handler<P> = Arc<dyn Fn(&P) + Send + Sync>;

struct Registry<K, P> {
    /// Topic owning each live subscription.
    owners: SlotMap<SubscriptionId, K>,
    /// Handlers per topic, in registration order.
    topics: HashMap<K, Vec<(SubscriptionId, Handler<P>)>>,
}

/// A publish/subscribe registry keyed by topic.
///
/// # Type Parameters
///
/// - `K`: The topic key. Structured enums are preferred over strings so that
///   two unrelated targets can never collide on a key.
/// - `P`: The payload passed by reference to every handler.
///
/// # Lifetime
///
/// A broadcaster is an ordinary value. Give each independent component tree
/// its own instance (typically behind an `Arc`) rather than sharing one
/// process-wide registry.
pub struct Broadcaster<K, P> {
    registry: Mutex<Registry<K, P>>,
}

static_assertions::assert_impl_all!(Broadcaster<u64, String>: Send, Sync);

impl<K, P> Default for Broadcaster<K, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    P: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> Broadcaster<K, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    P: 'static,
{
    /// Create an empty broadcaster.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                owners: SlotMap::with_key(),
                topics: HashMap::new(),
            }),
        }
    }

    /// Register `handler` for `topic`.
    ///
    /// The topic does not need to exist beforehand. Handlers registered for
    /// the same topic run in registration order.
    pub fn subscribe<F>(&self, topic: K, handler: F) -> SubscriptionId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.owners.insert(topic.clone());
        tracing::trace!(target: targets::BROADCAST, ?topic, ?id, "subscribe");
        registry
            .topics
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove the registration `id` from `topic`.
    ///
    /// Returns `true` if the registration existed and was removed, `false`
    /// otherwise. Calling this again with the same arguments is a no-op.
    pub fn unsubscribe(&self, topic: &K, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock();
        if registry.owners.get(id) != Some(topic) {
            return false;
        }
        registry.owners.remove(id);

        if let Some(handlers) = registry.topics.get_mut(topic) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                registry.topics.remove(topic);
            }
        }
        tracing::trace!(target: targets::BROADCAST, ?topic, ?id, "unsubscribe");
        true
    }

    /// Invoke every handler currently registered for `topic` with `payload`.
    ///
    /// Returns the number of handlers invoked. Publishing to a topic without
    /// subscribers does nothing and returns `0`.
    #[tracing::instrument(skip_all, target = "horizon_grid_core::broadcast", level = "trace")]
    pub fn publish(&self, topic: &K, payload: P) -> usize {
        let snapshot: Vec<(SubscriptionId, Handler<P>)> = {
            let registry = self.registry.lock();
            match registry.topics.get(topic) {
                Some(handlers) => handlers.clone(),
                None => {
                    tracing::trace!(target: targets::BROADCAST, ?topic, "no subscribers");
                    return 0;
                }
            }
        };
        tracing::trace!(
            target: targets::BROADCAST,
            ?topic,
            handler_count = snapshot.len(),
            "publishing"
        );

        let mut invoked = 0;
        for (id, handler) in snapshot {
            // Skip handlers removed by an earlier handler in this round.
            if !self.registry.lock().owners.contains_key(id) {
                continue;
            }
            handler(&payload);
            invoked += 1;
        }
        invoked
    }

    /// Register `handler` and return a guard that unsubscribes on drop.
    ///
    /// The guard only holds a weak reference to the broadcaster; dropping it
    /// after the broadcaster is gone is harmless.
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_grid_core::Broadcaster;
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicI32, Ordering};
    ///
    /// let broadcaster = Arc::new(Broadcaster::<u8, i32>::new());
    /// let counter = Arc::new(AtomicI32::new(0));
    /// {
    ///     let counter_clone = counter.clone();
    ///     let _guard = broadcaster.subscribe_scoped(1, move |&n| {
    ///         counter_clone.fetch_add(n, Ordering::SeqCst);
    ///     });
    ///     broadcaster.publish(&1, 42);
    /// }
    /// broadcaster.publish(&1, 43); // guard dropped, nothing happens
    /// assert_eq!(counter.load(Ordering::SeqCst), 42);
    /// ```
    pub fn subscribe_scoped<F>(self: &Arc<Self>, topic: K, handler: F) -> SubscriptionGuard<K, P>
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let id = self.subscribe(topic.clone(), handler);
        SubscriptionGuard {
            broadcaster: Arc::downgrade(self),
            topic,
            id,
        }
    }

    /// Number of handlers registered for `topic`.
    pub fn subscriber_count(&self, topic: &K) -> usize {
        self.registry
            .lock()
            .topics
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// Number of topics with at least one handler.
    pub fn topic_count(&self) -> usize {
        self.registry.lock().topics.len()
    }

    /// Total number of live registrations across all topics.
    pub fn subscription_count(&self) -> usize {
        self.registry.lock().owners.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.lock().owners.is_empty()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        let mut registry = self.registry.lock();
        crate::grid_debug!(subscriptions = registry.owners.len(), "clearing broadcaster");
        registry.owners.clear();
        registry.topics.clear();
    }
}

impl<K: fmt::Debug, P> fmt::Debug for Broadcaster<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("Broadcaster")
            .field("topics", &registry.topics.len())
            .field("subscriptions", &registry.owners.len())
            .finish()
    }
}

/// A subscription that is removed when the guard is dropped.
///
/// Created via [`Broadcaster::subscribe_scoped`].
pub struct SubscriptionGuard<K, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    P: 'static,
{
    broadcaster: Weak<Broadcaster<K, P>>,
    topic: K,
    id: SubscriptionId,
}

impl<K, P> SubscriptionGuard<K, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    P: 'static,
{
    /// The topic this guard is subscribed to.
    pub fn topic(&self) -> &K {
        &self.topic
    }

    /// The underlying subscription id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl<K, P> Drop for SubscriptionGuard<K, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    P: 'static,
{
    fn drop(&mut self) {
        if let Some(broadcaster) = self.broadcaster.upgrade() {
            broadcaster.unsubscribe(&self.topic, self.id);
        }
    }
}

impl<K, P> fmt::Debug for SubscriptionGuard<K, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    P: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}
