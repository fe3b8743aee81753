//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use confab_gateway::{
    ChannelId, ChatTransport, Embed, EventBus, Message, MessageId, ReactionSymbol,
    TransportError, TransportResult, UserId,
};
use confab_interactivity::Interactivity;

/// One outbound call recorded by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send {
        channel: ChannelId,
        message: MessageId,
        content: String,
        embed: Option<String>,
    },
    Edit {
        message: MessageId,
        content: String,
        embed: Option<String>,
    },
    React {
        message: MessageId,
        symbol: String,
    },
    ClearReactions {
        message: MessageId,
    },
    Delete {
        message: MessageId,
    },
}

/// Transport double that logs every outbound call and can be scripted
/// to fail edits.
pub struct RecordingTransport {
    user: UserId,
    next_message_id: AtomicU64,
    fail_edits: AtomicBool,
    actions: Mutex<Vec<Action>>,
}

impl RecordingTransport {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            next_message_id: AtomicU64::new(100),
            fail_edits: AtomicBool::new(false),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Make every subsequent edit fail with a connection error.
    pub fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    /// Bodies rendered to the host message, in edit order. For rich
    /// pages the embed description is the rendered body.
    pub fn rendered_bodies(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|action| match action {
                Action::Edit { content, embed, .. } => {
                    Some(if content.is_empty() {
                        embed.unwrap_or_default()
                    } else {
                        content
                    })
                }
                _ => None,
            })
            .collect()
    }

    /// Reaction symbols attached by the transport, in order.
    pub fn reactions_added(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|action| match action {
                Action::React { symbol, .. } => Some(symbol),
                _ => None,
            })
            .collect()
    }

    pub fn count_clears(&self) -> usize {
        self.actions()
            .iter()
            .filter(|a| matches!(a, Action::ClearReactions { .. }))
            .count()
    }

    pub fn count_deletes(&self) -> usize {
        self.actions()
            .iter()
            .filter(|a| matches!(a, Action::Delete { .. }))
            .count()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    fn current_user(&self) -> UserId {
        self.user
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &str,
        embed: Option<&Embed>,
    ) -> TransportResult<Message> {
        let id = MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst));
        self.actions.lock().push(Action::Send {
            channel,
            message: id,
            content: content.to_string(),
            embed: embed.map(|e| e.description.clone()),
        });
        Ok(Message {
            id,
            channel_id: channel,
            author: self.user,
            content: content.to_string(),
        })
    }

    async fn edit_message(
        &self,
        _channel: ChannelId,
        message: MessageId,
        content: &str,
        embed: Option<&Embed>,
    ) -> TransportResult<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(TransportError::Connection("scripted edit failure".into()));
        }
        self.actions.lock().push(Action::Edit {
            message,
            content: content.to_string(),
            embed: embed.map(|e| e.description.clone()),
        });
        Ok(())
    }

    async fn create_reaction(
        &self,
        _channel: ChannelId,
        message: MessageId,
        symbol: &ReactionSymbol,
    ) -> TransportResult<()> {
        self.actions.lock().push(Action::React {
            message,
            symbol: symbol.as_str().to_string(),
        });
        Ok(())
    }

    async fn delete_all_reactions(
        &self,
        _channel: ChannelId,
        message: MessageId,
    ) -> TransportResult<()> {
        self.actions.lock().push(Action::ClearReactions { message });
        Ok(())
    }

    async fn delete_message(&self, _channel: ChannelId, message: MessageId) -> TransportResult<()> {
        self.actions.lock().push(Action::Delete { message });
        Ok(())
    }
}

/// An interactivity layer over a fresh bus and recording transport.
pub fn recording_interactivity(
    bot_user: UserId,
) -> (Interactivity, Arc<EventBus>, Arc<RecordingTransport>) {
    let bus = Arc::new(EventBus::new());
    let transport = Arc::new(RecordingTransport::new(bot_user));
    let dyn_transport: Arc<dyn ChatTransport> = transport.clone();
    let layer = Interactivity::new(Arc::clone(&bus), dyn_transport);
    (layer, bus, transport)
}
