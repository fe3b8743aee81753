//! Push-based event dispatcher.
//!
//! The bus tracks handlers per [`EventKind`]. Emitting an event invokes
//! every handler registered for that kind at the moment of emission; a
//! handler keeps receiving events until it is unsubscribed.
//!
//! Dispatch snapshots the handler list under the registry lock and then
//! awaits each handler with the lock released, so handlers (and the
//! tasks awaiting their results) may subscribe or unsubscribe freely
//! while an emission is in flight. Emissions from separate tasks overlap
//! with each other and with any task awaiting a handler's outcome; no
//! delivery order across handlers is guaranteed.

use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::events::{Event, EventKind};

/// Boxed future returned by an event handler.
pub type HandlerFuture = BoxFuture<'static, ()>;

type EventHandler = Arc<dyn Fn(Event) -> HandlerFuture + Send + Sync>;

/// Counter for generating unique subscription IDs.
static SUBSCRIPTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a registered handler.
///
/// IDs are generated from an atomic counter and are never reused within
/// a process lifetime, so a stale token can never unsubscribe a handler
/// registered later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(SUBSCRIPTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// The event bus: central dispatcher for gateway events.
#[derive(Default)]
pub struct EventBus {
    /// Map from event kind -> registered handlers, in registration order.
    handlers: RwLock<HashMap<EventKind, Vec<(SubscriptionId, EventHandler)>>>,
}

impl EventBus {
    /// Create a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event kind.
    ///
    /// The handler is invoked for every subsequent event of that kind
    /// until [`EventBus::unsubscribe`] is called with the returned token.
    pub fn subscribe<F, Fut>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = SubscriptionId::next();
        let handler: EventHandler = Arc::new(move |event| Box::pin(handler(event)));

        let mut handlers = self.handlers.write();
        handlers.entry(kind).or_default().push((id, handler));
        tracing::debug!(%id, %kind, "handler subscribed");
        id
    }

    /// Register a handler and tie its lifetime to the returned guard.
    ///
    /// Dropping the [`Subscription`] unsubscribes the handler, which
    /// makes deregistration hold on every exit path of the owning task,
    /// including early return and cancellation.
    pub fn subscribe_guarded<F, Fut>(self: &Arc<Self>, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = self.subscribe(kind, handler);
        Subscription {
            bus: Arc::clone(self),
            id,
        }
    }

    /// Remove a handler by its subscription token.
    ///
    /// Returns false when the token is unknown or already removed;
    /// unsubscribing twice is a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        for (kind, list) in handlers.iter_mut() {
            if let Some(pos) = list.iter().position(|(sub_id, _)| *sub_id == id) {
                list.remove(pos);
                tracing::debug!(%id, %kind, "handler unsubscribed");
                return true;
            }
        }
        false
    }

    /// Count handlers currently registered for an event kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .read()
            .get(&kind)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Deliver an event to every handler registered for its kind.
    ///
    /// Handlers are awaited in registration order within this emission;
    /// emissions from separate tasks run concurrently.
    pub async fn emit(&self, event: Event) {
        let kind = event.kind();
        let snapshot: Vec<EventHandler> = {
            let handlers = self.handlers.read();
            handlers
                .get(&kind)
                .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };

        tracing::trace!(%kind, handlers = snapshot.len(), "dispatching event");
        for handler in snapshot {
            handler(event.clone()).await;
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read();
        let total: usize = handlers.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("handler_count", &total)
            .finish()
    }
}

/// RAII handle to a registered handler.
///
/// Unsubscribes the handler when dropped. Obtained from
/// [`EventBus::subscribe_guarded`].
#[must_use = "dropping the subscription immediately unsubscribes the handler"]
pub struct Subscription {
    bus: Arc<EventBus>,
    id: SubscriptionId,
}

impl Subscription {
    /// The token of the underlying registration.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
