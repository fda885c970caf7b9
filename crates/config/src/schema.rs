use std::collections::HashSet;

use {
    serde::{Deserialize, Serialize},
    shelter_common::{ChatId, Shelter},
};

use crate::error::{Error, Result};

/// Root configuration of the shelter bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelterBotConfig {
    /// Transport section, parsed by the Telegram adapter.
    pub telegram: serde_json::Value,
    /// Shelters offered to visitors.
    pub shelters: Vec<Shelter>,
    /// Chats that receive relayed visitor questions.
    pub volunteers: Vec<VolunteerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerConfig {
    pub chat_id: ChatId,
    #[serde(default)]
    pub name: String,
}

impl ShelterBotConfig {
    /// Reject duplicate shelter ids and volunteer chats.
    pub fn validate(&self) -> Result<()> {
        let mut shelter_ids = HashSet::new();
        for shelter in &self.shelters {
            if shelter.id <= 0 {
                return Err(Error::message(format!(
                    "shelter \"{}\" needs a positive id",
                    shelter.name
                )));
            }
            if !shelter_ids.insert(shelter.id) {
                return Err(Error::message(format!("duplicate shelter id {}", shelter.id)));
            }
        }

        let mut chats = HashSet::new();
        for volunteer in &self.volunteers {
            if !chats.insert(volunteer.chat_id) {
                return Err(Error::message(format!(
                    "duplicate volunteer chat {}",
                    volunteer.chat_id
                )));
            }
        }
        Ok(())
    }
}
