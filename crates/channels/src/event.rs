use {
    serde::{Deserialize, Serialize},
    shelter_common::ChatId,
};

/// Opaque reference to a file held by the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(pub String);

impl FileRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single chat-originated occurrence that needs a routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Free text, optionally with a photo or sent as a reply.
    Message {
        chat_id: ChatId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Text of the message this one replies to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_to_text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attachment: Option<FileRef>,
    },
    /// An inline keyboard button press.
    Callback { chat_id: ChatId, data: String },
}

impl InboundEvent {
    #[must_use]
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self::Message {
            chat_id,
            text: Some(text.into()),
            reply_to_text: None,
            attachment: None,
        }
    }

    #[must_use]
    pub fn callback(chat_id: ChatId, data: impl Into<String>) -> Self {
        Self::Callback {
            chat_id,
            data: data.into(),
        }
    }

    #[must_use]
    pub fn chat_id(&self) -> ChatId {
        match self {
            Self::Message { chat_id, .. } | Self::Callback { chat_id, .. } => *chat_id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::Callback { .. } => "callback",
        }
    }
}

/// An inline button: a label and the callback token it sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub label: String,
    pub callback: String,
}

impl InlineButton {
    #[must_use]
    pub fn new(label: impl Into<String>, callback: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback: callback.into(),
        }
    }
}

/// Keyboard layout attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rows", rename_all = "snake_case")]
pub enum Keyboard {
    /// Persistent keyboard replacing the text input; buttons send their label.
    Reply(Vec<Vec<String>>),
    /// Buttons attached to the message; presses arrive as callbacks.
    Inline(Vec<Vec<InlineButton>>),
}

impl Keyboard {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Reply(rows) => rows.iter().all(Vec::is_empty),
            Self::Inline(rows) => rows.iter().all(Vec::is_empty),
        }
    }
}

/// A unit of chat output destined for one chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundAction {
    pub chat_id: ChatId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
}

impl OutboundAction {
    #[must_use]
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    #[must_use]
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
