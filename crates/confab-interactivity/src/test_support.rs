//! Shared fixtures for the crate's unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use confab_gateway::{
    ChannelId, ChatTransport, Embed, Event, EventBus, Message, MessageId, ReactionEvent,
    ReactionsCleared, ReactionSymbol, TransportResult, TypingStarted, UserId,
};

use crate::Interactivity;

/// Transport double for tests that never touch the outbound boundary.
pub(crate) struct NoopTransport;

#[async_trait]
impl ChatTransport for NoopTransport {
    fn current_user(&self) -> UserId {
        UserId(0)
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &str,
        _embed: Option<&Embed>,
    ) -> TransportResult<Message> {
        Ok(Message {
            id: MessageId(1),
            channel_id: channel,
            author: self.current_user(),
            content: content.to_string(),
        })
    }

    async fn edit_message(
        &self,
        _channel: ChannelId,
        _message: MessageId,
        _content: &str,
        _embed: Option<&Embed>,
    ) -> TransportResult<()> {
        Ok(())
    }

    async fn create_reaction(
        &self,
        _channel: ChannelId,
        _message: MessageId,
        _symbol: &ReactionSymbol,
    ) -> TransportResult<()> {
        Ok(())
    }

    async fn delete_all_reactions(
        &self,
        _channel: ChannelId,
        _message: MessageId,
    ) -> TransportResult<()> {
        Ok(())
    }

    async fn delete_message(
        &self,
        _channel: ChannelId,
        _message: MessageId,
    ) -> TransportResult<()> {
        Ok(())
    }
}

/// An interactivity layer over a fresh bus and a no-op transport.
pub(crate) fn interactivity() -> (Interactivity, Arc<EventBus>) {
    let bus = Arc::new(EventBus::new());
    let layer = Interactivity::new(Arc::clone(&bus), Arc::new(NoopTransport));
    (layer, bus)
}

pub(crate) fn message(id: u64, channel: u64, author: u64, content: &str) -> Event {
    Event::MessageCreated(Message {
        id: MessageId(id),
        channel_id: ChannelId(channel),
        author: UserId(author),
        content: content.to_string(),
    })
}

pub(crate) fn reaction_added(message: u64, user: u64, symbol: &str) -> Event {
    Event::ReactionAdded(ReactionEvent {
        message_id: MessageId(message),
        channel_id: ChannelId(1),
        user_id: UserId(user),
        symbol: ReactionSymbol::new(symbol),
    })
}

pub(crate) fn reaction_removed(message: u64, user: u64, symbol: &str) -> Event {
    Event::ReactionRemoved(ReactionEvent {
        message_id: MessageId(message),
        channel_id: ChannelId(1),
        user_id: UserId(user),
        symbol: ReactionSymbol::new(symbol),
    })
}

pub(crate) fn reactions_cleared(message: u64) -> Event {
    Event::ReactionsCleared(ReactionsCleared {
        message_id: MessageId(message),
        channel_id: ChannelId(1),
    })
}

pub(crate) fn typing(channel: u64, user: u64) -> Event {
    Event::TypingStarted(TypingStarted {
        channel_id: ChannelId(channel),
        user_id: UserId(user),
    })
}
