//! Gateway boundary for the confab interactivity toolkit.
//!
//! This crate defines the two surfaces the interactivity layer is built
//! against:
//!
//! - **`EventBus`**: push-based dispatcher. The gateway connection feeds
//!   decoded events into [`EventBus::emit`]; consumers register handlers
//!   per [`EventKind`] and receive every subsequent event of that kind
//!   until they unsubscribe.
//! - **`ChatTransport`**: outbound REST-style calls (send/edit messages,
//!   add/strip reactions). Implementations own serialization, HTTP
//!   dispatch, and rate limiting; nothing in this workspace retries a
//!   failed transport call.
//!
//! Handler registration is token-based. [`EventBus::subscribe_guarded`]
//! returns an RAII [`Subscription`] that deregisters on drop, so a
//! handler cannot outlive the task that installed it.

pub mod bus;
pub mod events;
pub mod ids;
pub mod transport;

pub use bus::{EventBus, Subscription, SubscriptionId};
pub use events::{
    Embed, Event, EventKind, Message, ReactionEvent, ReactionsCleared, TypingStarted,
};
pub use ids::{ChannelId, MessageId, ReactionSymbol, UserId};
pub use transport::{ChatTransport, TransportError, TransportResult};
