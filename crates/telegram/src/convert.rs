//! Telegram updates to transport-neutral inbound events.

use {
    shelter_channels::{FileRef, InboundEvent},
    teloxide::types::{CallbackQuery, Message, PhotoSize},
};

/// Text or caption of a message.
fn text_of(msg: &Message) -> Option<&str> {
    msg.text().or_else(|| msg.caption())
}

/// Returns the largest photo size for best quality.
fn largest_photo(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    sizes
        .iter()
        .max_by_key(|size| u64::from(size.width) * u64::from(size.height))
}

#[must_use]
pub fn message_event(msg: &Message) -> InboundEvent {
    InboundEvent::Message {
        chat_id: msg.chat.id.0,
        text: text_of(msg).map(str::to_string),
        reply_to_text: msg
            .reply_to_message()
            .and_then(text_of)
            .map(str::to_string),
        attachment: msg
            .photo()
            .and_then(largest_photo)
            .map(|photo| FileRef::new(photo.file.id.to_string())),
    }
}

/// A button press, addressed to the chat holding the keyboard.
///
/// Falls back to the sender's private chat when the message is gone.
/// Presses without callback data are ignored.
#[must_use]
pub fn callback_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.as_deref()?;
    let chat_id = match &query.message {
        Some(message) => message.chat().id.0,
        None => i64::try_from(query.from.id.0).ok()?,
    };
    Some(InboundEvent::callback(chat_id, data))
}
