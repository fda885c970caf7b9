use {
    async_trait::async_trait,
    shelter_channels::{
        AttachmentFetcher, ChatOutbound, Error as ChannelError, FileRef, Keyboard, OutboundAction,
        Result as ChannelResult,
    },
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{
            ChatId, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
            ReplyMarkup,
        },
    },
    tracing::debug,
};

use crate::error::Result;

/// Sends replies and downloads attachments through the Bot API.
pub struct TelegramOutbound {
    bot: Bot,
    http: reqwest::Client,
}

impl TelegramOutbound {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            http: reqwest::Client::new(),
        }
    }

    /// Download a file from Telegram by file ID.
    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let file = self.bot.get_file(file_id).await?;

        // Telegram file URL format: <api>/file/bot<token>/<file_path>
        let mut url = self.bot.api_url();
        url.set_path(&format!("file/bot{}/{}", self.bot.token(), file.path));

        let response = self.http.get(url.as_str()).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Reply(rows) => ReplyMarkup::Keyboard(KeyboardMarkup::new(
            rows.iter()
                .map(|row| row.iter().map(KeyboardButton::new).collect::<Vec<_>>()),
        )),
        Keyboard::Inline(rows) => ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(
            rows.iter().map(|row| {
                row.iter()
                    .map(|button| {
                        InlineKeyboardButton::callback(&button.label, &button.callback)
                    })
                    .collect::<Vec<_>>()
            }),
        )),
    }
}

#[async_trait]
impl ChatOutbound for TelegramOutbound {
    async fn send(&self, action: &OutboundAction) -> ChannelResult<()> {
        let mut request = self.bot.send_message(ChatId(action.chat_id), &action.text);
        if let Some(keyboard) = &action.keyboard {
            request = request.reply_markup(reply_markup(keyboard));
        }
        request.await.map_err(|e| match e {
            RequestError::Api(
                reason @ (ApiError::BotBlocked
                | ApiError::ChatNotFound
                | ApiError::UserDeactivated
                | ApiError::BotKicked),
            ) => ChannelError::chat_unreachable(action.chat_id, reason),
            other => ChannelError::external("telegram sendMessage", other),
        })?;
        debug!(chat_id = action.chat_id, "telegram reply sent");
        Ok(())
    }
}

#[async_trait]
impl AttachmentFetcher for TelegramOutbound {
    async fn fetch(&self, file: &FileRef) -> ChannelResult<Vec<u8>> {
        self.download(file.as_str())
            .await
            .map_err(|e| ChannelError::external("telegram file download", e))
    }
}
