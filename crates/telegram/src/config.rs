use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use crate::error::{Error, Result};

/// The `[telegram]` config section.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Long-poll timeout passed to `getUpdates`, in seconds.
    pub poll_timeout_secs: u32,

    /// HTTP client timeout. Must exceed the poll timeout.
    pub client_timeout_secs: u64,
}

impl TelegramConfig {
    /// Parse the raw config section and check it can be used.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = if value.is_null() {
            Self::default()
        } else {
            serde_json::from_value(value)?
        };
        if config.token.expose_secret().trim().is_empty() {
            return Err(Error::message("telegram.token is not set"));
        }
        if config.client_timeout_secs <= u64::from(config.poll_timeout_secs) {
            return Err(Error::message(
                "telegram.client_timeout_secs must be greater than poll_timeout_secs",
            ));
        }
        Ok(config)
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("client_timeout_secs", &self.client_timeout_secs)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            poll_timeout_secs: 30,
            client_timeout_secs: 45,
        }
    }
}
