//! Telegram transport for the shelter bot.
//!
//! Uses teloxide long polling. Updates become [`InboundEvent`]s for the
//! dispatcher; replies and file downloads go through [`TelegramOutbound`].
//!
//! [`InboundEvent`]: shelter_channels::InboundEvent

pub mod bot;
pub mod config;
pub mod convert;
pub mod error;
pub mod outbound;

pub use {
    bot::{connect, start_polling},
    config::TelegramConfig,
    error::{Error, Result},
    outbound::TelegramOutbound,
};
