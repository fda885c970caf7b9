//! Channel-neutral chat types.
//!
//! Inbound events and outbound actions are described here independently of
//! the messaging platform; a transport adapter converts its native updates
//! into [`InboundEvent`] and implements [`ChatOutbound`] to deliver
//! [`OutboundAction`].

pub mod error;
pub mod event;
pub mod plugin;

pub use {
    error::{Error, Result},
    event::{FileRef, InboundEvent, InlineButton, Keyboard, OutboundAction},
    plugin::{AttachmentFetcher, ChatOutbound},
};
