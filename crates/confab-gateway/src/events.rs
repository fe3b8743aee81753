//! Typed gateway events and their subscription keys.
//!
//! The gateway connection decodes each push into an [`Event`] and feeds
//! it to [`crate::EventBus::emit`]. Handlers subscribe by [`EventKind`],
//! the fieldless discriminant of the event enum.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{ChannelId, MessageId, ReactionSymbol, UserId};

/// Event kinds supported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A message was posted to a channel.
    #[serde(rename = "message:created")]
    MessageCreated,

    /// A reaction was added to a message.
    #[serde(rename = "reaction:added")]
    ReactionAdded,

    /// A single user's reaction was removed from a message.
    #[serde(rename = "reaction:removed")]
    ReactionRemoved,

    /// All reactions were stripped from a message at once.
    #[serde(rename = "reaction:cleared")]
    ReactionsCleared,

    /// A user started typing in a channel.
    #[serde(rename = "typing:started")]
    TypingStarted,
}

impl EventKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MessageCreated => "message:created",
            Self::ReactionAdded => "reaction:added",
            Self::ReactionRemoved => "reaction:removed",
            Self::ReactionsCleared => "reaction:cleared",
            Self::TypingStarted => "typing:started",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message as delivered by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message id.
    pub id: MessageId,
    /// Channel the message was posted in.
    pub channel_id: ChannelId,
    /// User who posted the message.
    pub author: UserId,
    /// Plain-text body.
    pub content: String,
}

/// A reaction add or remove push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Message the reaction targets.
    pub message_id: MessageId,
    /// Channel containing the message.
    pub channel_id: ChannelId,
    /// User who added or removed the reaction.
    pub user_id: UserId,
    /// The reaction symbol.
    pub symbol: ReactionSymbol,
}

/// All reactions on a message were removed at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionsCleared {
    /// Message whose reactions were stripped.
    pub message_id: MessageId,
    /// Channel containing the message.
    pub channel_id: ChannelId,
}

/// A user started typing in a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingStarted {
    /// Channel the typing indicator fired in.
    pub channel_id: ChannelId,
    /// User who started typing.
    pub user_id: UserId,
}

/// A rich-content block attached to or replacing a message body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    /// Body text of the block.
    pub description: String,
}

impl Embed {
    /// Create an embed with the given description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// An event in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Event {
    /// A message was posted.
    MessageCreated(Message),
    /// A reaction was added.
    ReactionAdded(ReactionEvent),
    /// A reaction was removed.
    ReactionRemoved(ReactionEvent),
    /// All reactions on a message were stripped.
    ReactionsCleared(ReactionsCleared),
    /// A typing indicator fired.
    TypingStarted(TypingStarted),
}

impl Event {
    /// The subscription key this event dispatches under.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MessageCreated(_) => EventKind::MessageCreated,
            Self::ReactionAdded(_) => EventKind::ReactionAdded,
            Self::ReactionRemoved(_) => EventKind::ReactionRemoved,
            Self::ReactionsCleared(_) => EventKind::ReactionsCleared,
            Self::TypingStarted(_) => EventKind::TypingStarted,
        }
    }
}
