//! Shared domain records and error definitions used across the shelter crates.

pub mod error;
pub mod types;

pub use {
    error::FromMessage,
    types::{
        AwaitedField, ChatId, NewReport, Report, ReportPatch, Shelter, ShelterField, User,
        UserPatch,
    },
};
