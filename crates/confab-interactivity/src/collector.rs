//! Reaction tallies: count reactions on one message over a window.
//!
//! Three handlers scoped to the target message keep a live symbol ->
//! count mapping: increment on add, decrement on remove (dropping the
//! entry at zero), clear on remove-all. The bus may deliver those pushes
//! concurrently, so every mutation goes through one shared, locked
//! tally. The map is cleared in place and never reassigned - a handler
//! holding the tally reference always sees the current state, never a
//! stale allocation from before a reset.
//!
//! Collection has no early-completion condition: it always observes the
//! full window, then resolves to a snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use confab_gateway::{Event, EventKind, MessageId, ReactionSymbol};

use crate::Interactivity;

/// Mapping from reaction symbol to a positive count.
///
/// A symbol present in the tally always has count >= 1.
pub type ReactionTally = HashMap<ReactionSymbol, u32>;

impl Interactivity {
    /// Watch `message` for `timeout`, then return a snapshot of its
    /// reaction counts as observed from the event stream.
    ///
    /// Reactions already on the message when collection starts are not
    /// counted; only adds and removes delivered during the window move
    /// the tally.
    pub async fn collect_reactions(&self, message: MessageId, timeout: Duration) -> ReactionTally {
        let tally: Arc<Mutex<ReactionTally>> = Arc::new(Mutex::new(HashMap::new()));

        let add_tally = Arc::clone(&tally);
        let _add = self
            .bus()
            .subscribe_guarded(EventKind::ReactionAdded, move |event| {
                let tally = Arc::clone(&add_tally);
                async move {
                    if let Event::ReactionAdded(reaction) = event {
                        if reaction.message_id == message {
                            *tally.lock().entry(reaction.symbol).or_insert(0) += 1;
                        }
                    }
                }
            });

        let remove_tally = Arc::clone(&tally);
        let _remove = self
            .bus()
            .subscribe_guarded(EventKind::ReactionRemoved, move |event| {
                let tally = Arc::clone(&remove_tally);
                async move {
                    if let Event::ReactionRemoved(reaction) = event {
                        if reaction.message_id == message {
                            remove_one(&mut tally.lock(), &reaction.symbol);
                        }
                    }
                }
            });

        let clear_tally = Arc::clone(&tally);
        let _clear = self
            .bus()
            .subscribe_guarded(EventKind::ReactionsCleared, move |event| {
                let tally = Arc::clone(&clear_tally);
                async move {
                    if let Event::ReactionsCleared(cleared) = event {
                        if cleared.message_id == message {
                            // In-place clear; handlers share this exact
                            // map and must keep seeing it after a reset.
                            tally.lock().clear();
                        }
                    }
                }
            });

        tokio::time::sleep(timeout).await;

        let snapshot = tally.lock().clone();
        tracing::debug!(%message, symbols = snapshot.len(), "reaction collection window closed");
        snapshot
        // Guards drop here, deregistering all three handlers before the
        // snapshot reaches the caller.
    }
}

/// Decrement a symbol's count, removing the entry when it reaches zero.
///
/// A remove for a symbol the tally never saw (for example a reaction
/// added before collection started) is ignored rather than underflowing.
fn remove_one(tally: &mut ReactionTally, symbol: &ReactionSymbol) {
    if let Some(count) = tally.get_mut(symbol) {
        *count -= 1;
        if *count == 0 {
            tally.remove(symbol);
        }
    }
}
