//! Single-result event correlation.
//!
//! [`Interactivity::wait_for_event`] registers one filtering handler on
//! the bus, resolves with the first event the filter accepts, and
//! deregisters the handler before returning - on the match path, the
//! timeout path, and cancellation alike (the registration is held by an
//! RAII guard).
//!
//! The completion slot is write-once: concurrent deliveries after the
//! first match are no-ops, so firing the same matching event twice can
//! never resolve two different values. Timeouts resolve to `None`,
//! which is absence, not an error.
//!
//! The named waiters below are all thin parameterizations of the same
//! primitive: they differ only in which event field is extracted and
//! which exact-match conditions are ANDed into the filter.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use confab_gateway::{
    ChannelId, Event, EventKind, Message, MessageId, ReactionEvent, ReactionSymbol, UserId,
};

use crate::Interactivity;

impl Interactivity {
    /// Wait for the next event of `kind` the filter accepts.
    ///
    /// `filter_map` is invoked inline on every delivered event of that
    /// kind; the first `Some` value resolves the call. It must be fast
    /// and side-effect free. A panicking filter is caught, logged, and
    /// treated as a non-match so it cannot poison the dispatch loop.
    ///
    /// Returns `None` when `timeout` elapses with no accepted event.
    pub async fn wait_for_event<T, F>(
        &self,
        kind: EventKind,
        filter_map: F,
        timeout: Duration,
    ) -> Option<T>
    where
        T: Send + 'static,
        F: Fn(&Event) -> Option<T> + Send + Sync + 'static,
    {
        let (tx, rx) = oneshot::channel::<T>();
        // First writer wins: whoever takes the sender out of the slot
        // completes the waiter; every later delivery sees None.
        let slot = Arc::new(Mutex::new(Some(tx)));

        let guard = self.bus().subscribe_guarded(kind, move |event| {
            let slot = Arc::clone(&slot);
            let matched = match catch_unwind(AssertUnwindSafe(|| filter_map(&event))) {
                Ok(matched) => matched,
                Err(_) => {
                    tracing::warn!(kind = %event.kind(), "waiter filter panicked, treating event as non-match");
                    None
                }
            };
            async move {
                if let Some(value) = matched {
                    if let Some(tx) = slot.lock().take() {
                        // Receiver gone means the waiter already timed
                        // out and is tearing down.
                        let _ = tx.send(value);
                    }
                }
            }
        });

        let result = match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(value)) => Some(value),
            // Elapsed, or the sender dropped without firing.
            _ => None,
        };

        // Deregister before handing the result back; a matching event
        // delivered after this point reaches nobody.
        drop(guard);
        result
    }

    /// Wait for the next message matching `predicate`.
    pub async fn wait_for_message<P>(&self, predicate: P, timeout: Duration) -> Option<Message>
    where
        P: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        self.wait_for_event(
            EventKind::MessageCreated,
            move |event| match event {
                Event::MessageCreated(message) if predicate(message) => Some(message.clone()),
                _ => None,
            },
            timeout,
        )
        .await
    }

    /// Wait for the next reaction whose symbol matches `predicate`,
    /// regardless of message or reactor.
    pub async fn wait_for_reaction<P>(
        &self,
        predicate: P,
        timeout: Duration,
    ) -> Option<ReactionEvent>
    where
        P: Fn(&ReactionSymbol) -> bool + Send + Sync + 'static,
    {
        self.wait_for_event(
            EventKind::ReactionAdded,
            move |event| match event {
                Event::ReactionAdded(reaction) if predicate(&reaction.symbol) => {
                    Some(reaction.clone())
                }
                _ => None,
            },
            timeout,
        )
        .await
    }

    /// Wait for the next reaction from `user` whose symbol matches
    /// `predicate`.
    pub async fn wait_for_reaction_from<P>(
        &self,
        predicate: P,
        user: UserId,
        timeout: Duration,
    ) -> Option<ReactionEvent>
    where
        P: Fn(&ReactionSymbol) -> bool + Send + Sync + 'static,
    {
        // The user check runs inside the correlation filter; filtering
        // the resolved value instead would let another reactor consume
        // the waiter.
        self.wait_for_event(
            EventKind::ReactionAdded,
            move |event| match event {
                Event::ReactionAdded(reaction)
                    if reaction.user_id == user && predicate(&reaction.symbol) =>
                {
                    Some(reaction.clone())
                }
                _ => None,
            },
            timeout,
        )
        .await
    }

    /// Wait for any reaction on `message`, optionally restricted to one
    /// reactor. Resolves to the reaction symbol.
    pub async fn wait_for_message_reaction(
        &self,
        message: MessageId,
        user: Option<UserId>,
        timeout: Duration,
    ) -> Option<ReactionSymbol> {
        self.wait_for_message_reaction_matching(|_| true, message, user, timeout)
            .await
    }

    /// Wait for a reaction on `message` whose symbol matches
    /// `predicate`, optionally restricted to one reactor.
    pub async fn wait_for_message_reaction_matching<P>(
        &self,
        predicate: P,
        message: MessageId,
        user: Option<UserId>,
        timeout: Duration,
    ) -> Option<ReactionSymbol>
    where
        P: Fn(&ReactionSymbol) -> bool + Send + Sync + 'static,
    {
        self.wait_for_event(
            EventKind::ReactionAdded,
            move |event| match event {
                Event::ReactionAdded(reaction)
                    if reaction.message_id == message
                        && user.map_or(true, |u| reaction.user_id == u)
                        && predicate(&reaction.symbol) =>
                {
                    Some(reaction.symbol.clone())
                }
                _ => None,
            },
            timeout,
        )
        .await
    }

    /// Wait for the next user to start typing in `channel`.
    pub async fn wait_for_typing_user(
        &self,
        channel: ChannelId,
        timeout: Duration,
    ) -> Option<UserId> {
        self.wait_for_event(
            EventKind::TypingStarted,
            move |event| match event {
                Event::TypingStarted(typing) if typing.channel_id == channel => {
                    Some(typing.user_id)
                }
                _ => None,
            },
            timeout,
        )
        .await
    }

    /// Wait for `user` to start typing anywhere; resolves to the
    /// channel they typed in.
    pub async fn wait_for_typing_channel(
        &self,
        user: UserId,
        timeout: Duration,
    ) -> Option<ChannelId> {
        self.wait_for_event(
            EventKind::TypingStarted,
            move |event| match event {
                Event::TypingStarted(typing) if typing.user_id == user => Some(typing.channel_id),
                _ => None,
            },
            timeout,
        )
        .await
    }
}
