//! In-memory conversation state.
//!
//! Two keyed buffers hold what a conversation is waiting for:
//! [`PendingRequests`] remembers which field a chat is expected to send next,
//! [`RelayQuestions`] remembers which volunteer a visitor's question goes to.
//! Neither survives a restart.

pub mod buffer;
pub mod pending;
pub mod relay;

use std::sync::Arc;

pub use {
    buffer::{Keyed, KeyedBuffer},
    pending::{PendingRequest, PendingRequests},
    relay::{RelayQuestion, RelayQuestions},
};

/// Both session buffers, shared between the dispatcher and the routers.
#[derive(Default)]
pub struct SessionStore {
    pub pending: PendingRequests,
    pub relays: RelayQuestions,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}
