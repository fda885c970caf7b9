//! Configuration loading with env substitution.
//!
//! Config files: `shelter-bot.toml`, `shelter-bot.yaml`, or `shelter-bot.json`,
//! searched in `./` then the user config directory.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, load_config},
    schema::{ShelterBotConfig, VolunteerConfig},
};
