use std::sync::atomic::{AtomicU64, Ordering};

use {shelter_common::ChatId, tracing::debug};

use crate::buffer::{Keyed, KeyedBuffer};

/// A visitor's question routed to a volunteer and not answered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayQuestion {
    pub id: u64,
    pub user_chat: ChatId,
    pub volunteer_chat: ChatId,
}

impl Keyed for RelayQuestion {
    type Key = ChatId;

    fn key(&self) -> ChatId {
        self.user_chat
    }
}

/// Open relay questions, one per visitor chat.
///
/// The id is embedded in the text forwarded to the volunteer so that a
/// threaded reply can be matched back to the visitor.
pub struct RelayQuestions {
    questions: KeyedBuffer<RelayQuestion>,
    next_id: AtomicU64,
}

impl Default for RelayQuestions {
    fn default() -> Self {
        Self {
            questions: KeyedBuffer::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl RelayQuestions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a question from `user_chat` to `volunteer_chat`, replacing any
    /// question the visitor still had open.
    pub fn open(&self, user_chat: ChatId, volunteer_chat: ChatId) -> RelayQuestion {
        let question = RelayQuestion {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            user_chat,
            volunteer_chat,
        };
        if let Some(previous) = self.questions.put(question.clone()) {
            debug!(
                user_chat,
                replaced = previous.id,
                id = question.id,
                "replaced open relay question"
            );
        }
        question
    }

    pub fn by_user_chat(&self, user_chat: ChatId) -> Option<RelayQuestion> {
        self.questions.get(user_chat)
    }

    pub fn by_id(&self, id: u64) -> Option<RelayQuestion> {
        self.questions.find(|q| q.id == id)
    }

    /// Remove the question with this id once it has been answered.
    pub fn close(&self, id: u64) -> Option<RelayQuestion> {
        let question = self.by_id(id)?;
        // A newer question from the same visitor stays open.
        self.questions
            .remove_if(question.user_chat, |current| current.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
