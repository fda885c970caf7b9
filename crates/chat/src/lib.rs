//! Conversation routing for the shelter bot.
//!
//! [`Dispatcher`] takes inbound events, hands messages to [`MessageRouter`]
//! and button presses to [`CallbackRouter`], then delivers the resulting
//! [`OutboundAction`](shelter_channels::OutboundAction)s.

pub mod callback;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod menu;
pub mod message;
pub mod replies;
pub mod services;

pub use {
    callback::CallbackRouter,
    command::Command,
    dispatcher::{BatchReport, Dispatcher},
    error::{Error, Result},
    menu::Menu,
    message::{MessageRouter, TextMessage},
    services::Services,
};
