//! Interactivity toolkit over a push-based chat gateway.
//!
//! The gateway broadcasts named events (message posted, reaction
//! added/removed, typing started) to every registered handler. This
//! crate turns that push model into synchronous-feeling primitives:
//!
//! - **Waiters** ([`waiter`]): "give me the next event matching this
//!   predicate, or give up after a timeout". One handler is registered
//!   per call, resolves at most once, and is deregistered on every exit
//!   path.
//! - **Reaction tallies** ([`collector`]): watch one message for a fixed
//!   duration and return a symbol -> count mapping of its reactions.
//! - **Pagination** ([`pagination`]): a multi-page message driven by
//!   five control reactions, edited in place as the authorized user
//!   moves the cursor.
//!
//! All primitives hang off [`Interactivity`], which pairs the event bus
//! with the outbound transport.

pub mod collector;
pub mod error;
pub mod pagination;
pub mod waiter;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use confab_gateway::{ChatTransport, EventBus};

pub use collector::ReactionTally;
pub use error::{InteractivityError, InteractivityResult};
pub use pagination::{
    controls, paginate_as_rich_blocks, paginate_text, CleanupPolicy, Page, DEFAULT_PAGE_LENGTH,
};

/// Entry point for interactive primitives.
///
/// Cheap to clone; clones share the same bus and transport.
#[derive(Clone)]
pub struct Interactivity {
    bus: Arc<EventBus>,
    transport: Arc<dyn ChatTransport>,
}

impl Interactivity {
    /// Create an interactivity layer over a bus and transport pair.
    pub fn new(bus: Arc<EventBus>, transport: Arc<dyn ChatTransport>) -> Self {
        Self { bus, transport }
    }

    /// The event bus this layer listens on.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// The outbound transport this layer sends through.
    pub fn transport(&self) -> &Arc<dyn ChatTransport> {
        &self.transport
    }
}

impl std::fmt::Debug for Interactivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interactivity")
            .field("bus", &self.bus)
            .finish()
    }
}
