use {
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
};

/// Chat identifier as assigned by the messaging platform.
pub type ChatId = i64;

/// A person talking to the bot: a visitor, an adopter, or a volunteer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub chat_id: ChatId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Shelter the user is currently talking about.
    pub shelter_id: Option<i64>,
    /// Animal the user adopted; daily reports refer to it.
    pub animal_id: Option<i64>,
    pub volunteer: bool,
}

/// Partial update of a [`User`]. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub shelter_id: Option<i64>,
}

/// A shelter and the reference texts visitors can ask about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shelter {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub schedule: String,
    pub scheme: String,
    pub safety: String,
    pub rules: String,
    pub docs: String,
    pub movement: String,
    pub arrangements: String,
    pub arrangements_for_young: String,
    pub arrangements_for_disabled: String,
    pub expert_advice_first: String,
    pub expert_advice_next: String,
    pub reject_reasons: String,
}

/// Informational fields of a [`Shelter`] that can be requested verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShelterField {
    Address,
    Schedule,
    Scheme,
    Safety,
    Rules,
    Docs,
    Movement,
    Arrangements,
    ArrangementsForYoung,
    ArrangementsForDisabled,
    ExpertAdviceFirst,
    ExpertAdviceNext,
    RejectReasons,
}

impl Shelter {
    #[must_use]
    pub fn field(&self, field: ShelterField) -> &str {
        match field {
            ShelterField::Address => &self.address,
            ShelterField::Schedule => &self.schedule,
            ShelterField::Scheme => &self.scheme,
            ShelterField::Safety => &self.safety,
            ShelterField::Rules => &self.rules,
            ShelterField::Docs => &self.docs,
            ShelterField::Movement => &self.movement,
            ShelterField::Arrangements => &self.arrangements,
            ShelterField::ArrangementsForYoung => &self.arrangements_for_young,
            ShelterField::ArrangementsForDisabled => &self.arrangements_for_disabled,
            ShelterField::ExpertAdviceFirst => &self.expert_advice_first,
            ShelterField::ExpertAdviceNext => &self.expert_advice_next,
            ShelterField::RejectReasons => &self.reject_reasons,
        }
    }
}

/// A daily adoption report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub animal_id: Option<i64>,
    pub date: NaiveDate,
    pub photo: Option<Vec<u8>>,
    pub diet: Option<String>,
    pub behavior: Option<String>,
    pub well_being: Option<String>,
}

/// Partial update of a [`Report`]. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPatch {
    pub photo: Option<Vec<u8>>,
    pub diet: Option<String>,
    pub behavior: Option<String>,
    pub well_being: Option<String>,
}

/// Fields for a report that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub user_id: i64,
    pub animal_id: Option<i64>,
    pub patch: ReportPatch,
}

/// A single piece of data the bot can wait for from a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AwaitedField {
    Phone,
    Email,
    Photo,
    Diet,
    Behavior,
    WellBeing,
}

impl AwaitedField {
    pub const ALL: [Self; 6] = [
        Self::Phone,
        Self::Email,
        Self::Photo,
        Self::Diet,
        Self::Behavior,
        Self::WellBeing,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Photo => "photo",
            Self::Diet => "diet",
            Self::Behavior => "behavior",
            Self::WellBeing => "well_being",
        }
    }
}

impl std::fmt::Display for AwaitedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
