//! Outbound transport boundary.
//!
//! Everything the interactivity layer sends back to the chat service
//! goes through [`ChatTransport`]: message creation and edits, reaction
//! management, deletion. Implementations own HTTP dispatch, payload
//! serialization, and rate-limit handling; callers here never retry.

use async_trait::async_trait;

use crate::events::{Embed, Message};
use crate::ids::{ChannelId, MessageId, ReactionSymbol, UserId};

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport operation errors.
///
/// Surfaced to callers unmodified; the caller decides whether a failed
/// edit or reaction aborts the surrounding session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Outbound calls against the chat service.
///
/// All methods are addressed by channel and message id so that
/// implementations can route without holding local message state.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// The user the transport is authenticated as.
    ///
    /// Interactive surfaces use this to ignore reactions the toolkit
    /// itself attached (for example pagination controls).
    fn current_user(&self) -> UserId;

    /// Post a message, returning it as the service recorded it.
    async fn send_message(
        &self,
        channel: ChannelId,
        content: &str,
        embed: Option<&Embed>,
    ) -> TransportResult<Message>;

    /// Replace a message's body and embed in place.
    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: &str,
        embed: Option<&Embed>,
    ) -> TransportResult<()>;

    /// Attach a reaction to a message as the current user.
    async fn create_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        symbol: &ReactionSymbol,
    ) -> TransportResult<()>;

    /// Strip every reaction from a message.
    async fn delete_all_reactions(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> TransportResult<()>;

    /// Delete a message.
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> TransportResult<()>;
}
