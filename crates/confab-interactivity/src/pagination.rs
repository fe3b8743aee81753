//! Reaction-driven pagination.
//!
//! [`Interactivity::send_paginated`] posts the first page of a document
//! to a channel, attaches five control reactions, and then edits the
//! message in place as the authorized user presses them:
//!
//! | control | effect                      |
//! |---------|-----------------------------|
//! | ⏮      | jump to the first page      |
//! | ◀      | one page back               |
//! | ⏹      | end the session             |
//! | ▶      | one page forward            |
//! | ⏭      | jump to the last page       |
//!
//! Any other symbol is ignored. Cursor moves clamp at the boundaries:
//! pressing ▶ on the last page re-renders the same page rather than
//! erroring. The session ends when ⏹ is pressed or the timeout elapses,
//! at which point its handlers are deregistered and exactly one
//! [`CleanupPolicy`] outcome runs.
//!
//! Both adding and removing a control reaction drive the cursor, so the
//! user can toggle the same control repeatedly without re-reacting from
//! scratch. If some third party strips all reactions from the host
//! message mid-session, the controls are re-attached so the surface
//! stays usable.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use confab_gateway::{
    ChannelId, ChatTransport, Embed, Event, EventKind, MessageId, ReactionEvent, ReactionSymbol,
    TransportError, TransportResult, UserId,
};

use crate::error::{InteractivityError, InteractivityResult};
use crate::Interactivity;

/// Default page length, in characters, for the chunking helpers.
pub const DEFAULT_PAGE_LENGTH: usize = 2000;

/// The five control reactions, in the order they are attached.
pub mod controls {
    /// Jump to the first page.
    pub const FIRST: &str = "⏮";
    /// One page back.
    pub const PREVIOUS: &str = "◀";
    /// End the session.
    pub const STOP: &str = "⏹";
    /// One page forward.
    pub const NEXT: &str = "▶";
    /// Jump to the last page.
    pub const LAST: &str = "⏭";

    /// All controls in attach order.
    pub const ALL: [&str; 5] = [FIRST, PREVIOUS, STOP, NEXT, LAST];
}

/// One page of a paginated message.
///
/// At least one of the body and the embed is populated; the
/// constructors maintain that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Plain-text body, if any.
    pub content: Option<String>,
    /// Rich-content block, if any.
    pub embed: Option<Embed>,
}

impl Page {
    /// A plain-text page.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
        }
    }

    /// A rich-content page.
    pub fn rich(embed: Embed) -> Self {
        Self {
            content: None,
            embed: Some(embed),
        }
    }

    fn body(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// What happens to the host message when a session ends.
///
/// Exactly one outcome runs per session that terminates by stop or
/// timeout. A session aborted by a transport failure skips cleanup; the
/// caller holds the error and decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Leave the message and its reactions untouched.
    LeaveReactions,
    /// Strip all reactions, keep the message.
    RemoveReactions,
    /// Strip all reactions and delete the message.
    DeleteMessage,
}

/// Split `body` into fixed-size plain-text pages.
///
/// Chunks are `chunk_size` characters (the final chunk may be shorter);
/// splitting is by char, never inside a code point. An empty body
/// yields no pages. See [`DEFAULT_PAGE_LENGTH`].
pub fn paginate_text(body: &str, chunk_size: usize) -> Vec<Page> {
    chunk_chars(body, chunk_size)
        .into_iter()
        .map(Page::text)
        .collect()
}

/// Split `body` into fixed-size pages rendered as rich-content blocks.
pub fn paginate_as_rich_blocks(body: &str, chunk_size: usize) -> Vec<Page> {
    chunk_chars(body, chunk_size)
        .into_iter()
        .map(|chunk| Page::rich(Embed::new(chunk)))
        .collect()
}

fn chunk_chars(body: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut len = 0;

    for ch in body.chars() {
        current.push(ch);
        len += 1;
        if len == chunk_size {
            chunks.push(std::mem::take(&mut current));
            len = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// A recognized control press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    First,
    Previous,
    Stop,
    Next,
    Last,
}

impl Control {
    fn from_symbol(symbol: &ReactionSymbol) -> Option<Self> {
        match symbol.as_str() {
            controls::FIRST => Some(Self::First),
            controls::PREVIOUS => Some(Self::Previous),
            controls::STOP => Some(Self::Stop),
            controls::NEXT => Some(Self::Next),
            controls::LAST => Some(Self::Last),
            _ => None,
        }
    }
}

/// Shared state of one active session.
struct SessionState {
    pages: Vec<Page>,
    /// Zero-based page cursor; always < pages.len().
    cursor: Mutex<usize>,
    channel: ChannelId,
    message_id: MessageId,
}

/// Write-once terminal outcome of a session: `Ok` for an explicit stop,
/// `Err` for a transport failure inside a handler.
type CompletionSlot = Arc<Mutex<Option<oneshot::Sender<Result<(), TransportError>>>>>;

fn complete(slot: &CompletionSlot, outcome: Result<(), TransportError>) {
    if let Some(tx) = slot.lock().take() {
        let _ = tx.send(outcome);
    }
}

impl Interactivity {
    /// Run a paginated message session in `channel`, driven by
    /// `authorized_user`, until stop or timeout.
    ///
    /// Reactions from anyone else (including the transport's own user,
    /// whose reactions seed the controls) never move the cursor.
    ///
    /// # Errors
    ///
    /// [`InteractivityError::NoPages`] when `pages` is empty - nothing
    /// is sent and no handler is attached. Transport failures from the
    /// initial send, a mid-session edit, or cleanup are propagated.
    pub async fn send_paginated(
        &self,
        channel: ChannelId,
        authorized_user: UserId,
        pages: Vec<Page>,
        timeout: Duration,
        cleanup: CleanupPolicy,
    ) -> InteractivityResult<()> {
        if pages.is_empty() {
            return Err(InteractivityError::NoPages);
        }

        let transport = Arc::clone(self.transport());
        let first = &pages[0];
        let message = transport
            .send_message(channel, first.body(), first.embed.as_ref())
            .await?;
        let message_id = message.id;
        attach_controls(transport.as_ref(), channel, message_id).await?;

        let session = Arc::new(SessionState {
            pages,
            cursor: Mutex::new(0),
            channel,
            message_id,
        });
        let (tx, rx) = oneshot::channel();
        let slot: CompletionSlot = Arc::new(Mutex::new(Some(tx)));
        let own_user = transport.current_user();
        let qualifies = move |reaction: &ReactionEvent| {
            reaction.message_id == message_id
                && reaction.user_id == authorized_user
                && reaction.user_id != own_user
        };

        let _add = self.bus().subscribe_guarded(EventKind::ReactionAdded, {
            let transport = Arc::clone(&transport);
            let session = Arc::clone(&session);
            let slot = Arc::clone(&slot);
            move |event| {
                let transport = Arc::clone(&transport);
                let session = Arc::clone(&session);
                let slot = Arc::clone(&slot);
                async move {
                    if let Event::ReactionAdded(reaction) = event {
                        if qualifies(&reaction) {
                            drive_control(&*transport, &session, &slot, &reaction.symbol).await;
                        }
                    }
                }
            }
        });

        // Removing a control reaction drives the cursor too, so the
        // user can press the same control twice without the host
        // message's reactions being reset in between.
        let _remove = self.bus().subscribe_guarded(EventKind::ReactionRemoved, {
            let transport = Arc::clone(&transport);
            let session = Arc::clone(&session);
            let slot = Arc::clone(&slot);
            move |event| {
                let transport = Arc::clone(&transport);
                let session = Arc::clone(&session);
                let slot = Arc::clone(&slot);
                async move {
                    if let Event::ReactionRemoved(reaction) = event {
                        if qualifies(&reaction) {
                            drive_control(&*transport, &session, &slot, &reaction.symbol).await;
                        }
                    }
                }
            }
        });

        let _cleared = self.bus().subscribe_guarded(EventKind::ReactionsCleared, {
            let transport = Arc::clone(&transport);
            let slot = Arc::clone(&slot);
            move |event| {
                let transport = Arc::clone(&transport);
                let slot = Arc::clone(&slot);
                async move {
                    if let Event::ReactionsCleared(cleared) = event {
                        if cleared.message_id == message_id {
                            tracing::debug!(%message_id, "controls stripped externally, re-attaching");
                            if let Err(err) =
                                attach_controls(transport.as_ref(), channel, message_id).await
                            {
                                tracing::warn!(%message_id, error = %err, "re-attaching controls failed");
                                complete(&slot, Err(err));
                            }
                        }
                    }
                }
            }
        });

        let outcome = tokio::time::timeout(timeout, rx).await;

        // Deregister the session's handlers before any cleanup I/O; a
        // control pressed from here on reaches nobody.
        drop((_add, _remove, _cleared));

        match outcome {
            // Stop pressed.
            Ok(Ok(Ok(()))) => {}
            // A handler hit a transport failure; surface it rather than
            // leaving cursor state and displayed content divergent.
            Ok(Ok(Err(err))) => return Err(err.into()),
            // Timeout elapsed (or the slot vanished, same terminal).
            Ok(Err(_)) | Err(_) => {}
        }

        match cleanup {
            CleanupPolicy::LeaveReactions => {}
            CleanupPolicy::RemoveReactions => {
                transport.delete_all_reactions(channel, message_id).await?;
            }
            CleanupPolicy::DeleteMessage => {
                transport.delete_all_reactions(channel, message_id).await?;
                transport.delete_message(channel, message_id).await?;
            }
        }
        Ok(())
    }
}

/// Attach the five controls in their fixed order.
async fn attach_controls(
    transport: &dyn ChatTransport,
    channel: ChannelId,
    message: MessageId,
) -> TransportResult<()> {
    for symbol in controls::ALL {
        transport
            .create_reaction(channel, message, &ReactionSymbol::from(symbol))
            .await?;
    }
    Ok(())
}

/// Apply one qualifying control press to the session.
async fn drive_control(
    transport: &dyn ChatTransport,
    session: &SessionState,
    slot: &CompletionSlot,
    symbol: &ReactionSymbol,
) {
    let control = match Control::from_symbol(symbol) {
        Some(control) => control,
        None => return,
    };

    // A completed session ignores further presses even while its
    // handlers are still draining from the bus.
    if slot.lock().is_none() {
        return;
    }

    if control == Control::Stop {
        complete(slot, Ok(()));
        return;
    }

    // Cursor mutation is serialized under the lock; the render below
    // runs outside it so concurrent presses cannot deadlock the slot.
    let target = {
        let mut cursor = session.cursor.lock();
        let last = session.pages.len() - 1;
        *cursor = match control {
            Control::First => 0,
            Control::Previous => cursor.saturating_sub(1),
            Control::Next => (*cursor + 1).min(last),
            Control::Last => last,
            Control::Stop => unreachable!("stop handled above"),
        };
        *cursor
    };

    let page = &session.pages[target];
    if let Err(err) = transport
        .edit_message(
            session.channel,
            session.message_id,
            page.body(),
            page.embed.as_ref(),
        )
        .await
    {
        tracing::warn!(
            message = %session.message_id,
            page = target,
            error = %err,
            "page render failed, ending session"
        );
        complete(slot, Err(err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_text_chunk_lengths() {
        let pages = paginate_text(&"a".repeat(4500), 2000);
        assert_eq!(pages.len(), 3);

        let lengths: Vec<usize> = pages
            .iter()
            .map(|p| p.content.as_ref().unwrap().len())
            .collect();
        assert_eq!(lengths, vec![2000, 2000, 500]);
        assert!(pages.iter().all(|p| p.embed.is_none()));
    }

    #[test]
    fn test_paginate_text_exact_multiple() {
        let pages = paginate_text(&"b".repeat(4000), 2000);
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.content.as_ref().unwrap().len() == 2000));
    }

    #[test]
    fn test_paginate_text_empty_body() {
        assert!(paginate_text("", 2000).is_empty());
    }

    #[test]
    fn test_paginate_counts_chars_not_bytes() {
        // Four-byte scalar values; a byte-based splitter would cut
        // inside a code point.
        let body = "🦀".repeat(5);
        let pages = paginate_text(&body, 2);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].content.as_deref(), Some("🦀🦀"));
        assert_eq!(pages[2].content.as_deref(), Some("🦀"));
    }

    #[test]
    fn test_paginate_as_rich_blocks() {
        let pages = paginate_as_rich_blocks(&"c".repeat(2500), 2000);
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.content.is_none()));
        assert_eq!(pages[0].embed.as_ref().unwrap().description.len(), 2000);
        assert_eq!(pages[1].embed.as_ref().unwrap().description.len(), 500);
    }

    #[test]
    fn test_control_from_symbol() {
        assert_eq!(
            Control::from_symbol(&ReactionSymbol::new("⏮")),
            Some(Control::First)
        );
        assert_eq!(
            Control::from_symbol(&ReactionSymbol::new("⏹")),
            Some(Control::Stop)
        );
        assert_eq!(
            Control::from_symbol(&ReactionSymbol::new("⏭")),
            Some(Control::Last)
        );
        assert_eq!(Control::from_symbol(&ReactionSymbol::new("😀")), None);
    }

    #[test]
    fn test_controls_attach_order() {
        assert_eq!(controls::ALL, ["⏮", "◀", "⏹", "▶", "⏭"]);
    }

    #[test]
    fn test_page_constructors() {
        let text = Page::text("hello");
        assert_eq!(text.body(), "hello");
        assert!(text.embed.is_none());

        let rich = Page::rich(Embed::new("block"));
        assert_eq!(rich.body(), "");
        assert_eq!(rich.embed.as_ref().unwrap().description, "block");
    }
}
