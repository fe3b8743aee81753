//! Error taxonomy for interactive surfaces.
//!
//! Waiter timeouts are not errors: every waiter resolves to `None` on
//! timeout and callers check for absence. Errors here are contract
//! violations caught before any I/O, or transport failures propagated
//! from the gateway unmodified.

use confab_gateway::TransportError;

/// Result type for interactivity operations.
pub type InteractivityResult<T> = Result<T, InteractivityError>;

/// Interactivity operation errors.
#[derive(Debug, thiserror::Error)]
pub enum InteractivityError {
    /// A paginated session was requested with zero pages. Raised before
    /// any message is sent or handler attached.
    #[error("pagination requires at least one page")]
    NoPages,

    /// An outbound send/edit/react/delete call failed. Never retried
    /// here; the caller decides whether to abort the session.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
