use std::collections::BTreeSet;

use shelter_common::{AwaitedField, ChatId};

use crate::buffer::{Keyed, KeyedBuffer};

/// Per-chat record of which fields the bot is waiting to receive.
pub type PendingRequests = KeyedBuffer<PendingRequest>;

/// Expectation flags for a single chat.
///
/// Flows set exactly one flag per step, but nothing here enforces that.
/// [`PendingRequest::awaited`] picks the first set flag in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub chat_id: ChatId,
    expected: BTreeSet<AwaitedField>,
}

impl PendingRequest {
    #[must_use]
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            expected: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn expecting(mut self, field: AwaitedField) -> Self {
        self.set(field, true);
        self
    }

    pub fn set(&mut self, field: AwaitedField, expected: bool) {
        if expected {
            self.expected.insert(field);
        } else {
            self.expected.remove(&field);
        }
    }

    #[must_use]
    pub fn is_expected(&self, field: AwaitedField) -> bool {
        self.expected.contains(&field)
    }

    #[must_use]
    pub fn awaited(&self) -> Option<AwaitedField> {
        self.expected.first().copied()
    }
}

impl Keyed for PendingRequest {
    type Key = ChatId;

    fn key(&self) -> ChatId {
        self.chat_id
    }
}
