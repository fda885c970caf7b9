use std::error::Error as StdError;

use shelter_common::ChatId;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the transport traits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The platform will not deliver to this chat (blocked bot, deleted chat).
    #[error("chat {chat_id} is unreachable: {reason}")]
    ChatUnreachable { chat_id: ChatId, reason: String },

    /// The transport cannot serve the request right now.
    #[error("transport unavailable: {message}")]
    Unavailable { message: String },

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn chat_unreachable(chat_id: ChatId, reason: impl std::fmt::Display) -> Self {
        Self::ChatUnreachable {
            chat_id,
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
