//! Callback tokens carried by inline keyboard buttons.

use shelter_common::{AwaitedField, ChatId, ShelterField};

const SAVE_SHELTER: &str = "SAVE_SHELTER";
const ASK_VOLUNTEER: &str = "ASK_VOLUNTEER";
const ASK_ANY_VOLUNTEER: &str = "ASK_ANY_VOLUNTEER";

const INFO: [(ShelterField, &str, &str); 13] = [
    (ShelterField::Address, "INF_ADDRESS", "Address"),
    (ShelterField::Schedule, "INF_SCHEDULE", "Opening hours"),
    (ShelterField::Scheme, "INF_SCHEME", "How to get there"),
    (ShelterField::Safety, "INF_SAFETY", "Safety on site"),
    (ShelterField::Rules, "HOW_RULES", "Meeting the animals"),
    (ShelterField::Docs, "HOW_DOCS", "Documents"),
    (ShelterField::Movement, "HOW_MOVE", "Transporting"),
    (ShelterField::Arrangements, "HOW_ARRANGE", "Preparing a home"),
    (ShelterField::ArrangementsForYoung, "HOW_ARRANGE_YOUNG", "Home for a young animal"),
    (
        ShelterField::ArrangementsForDisabled,
        "HOW_ARRANGE_DISABLED",
        "Home for an animal with disabilities",
    ),
    (ShelterField::ExpertAdviceFirst, "HOW_EXPERT_FIRST", "First contact advice"),
    (ShelterField::ExpertAdviceNext, "HOW_EXPERT_NEXT", "Trusted specialists"),
    (ShelterField::RejectReasons, "HOW_REJECT_REASONS", "Why we may refuse"),
];

const COLLECT: [(AwaitedField, &str, &str); 6] = [
    (AwaitedField::Phone, "SAVE_USER_PHONE", "Phone"),
    (AwaitedField::Email, "SAVE_USER_EMAIL", "Email"),
    (AwaitedField::Photo, "SEND_PHOTO", "Photo"),
    (AwaitedField::Diet, "SEND_DIET", "Diet"),
    (AwaitedField::Behavior, "SEND_BEHAVIOR", "Behavior"),
    (AwaitedField::WellBeing, "SEND_WELL_BEING", "Well-being"),
];

/// A decoded inline button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Show one informational field of the active shelter.
    Info(ShelterField),
    /// Start waiting for a contact or report field.
    Collect(AwaitedField),
    SaveShelter(i64),
    AskVolunteer(ChatId),
    AskAnyVolunteer,
}

impl Command {
    pub const SHELTER_INFO: [Self; 4] = [
        Self::Info(ShelterField::Address),
        Self::Info(ShelterField::Schedule),
        Self::Info(ShelterField::Scheme),
        Self::Info(ShelterField::Safety),
    ];

    pub const ANIMAL_INFO: [Self; 9] = [
        Self::Info(ShelterField::Rules),
        Self::Info(ShelterField::Docs),
        Self::Info(ShelterField::Movement),
        Self::Info(ShelterField::Arrangements),
        Self::Info(ShelterField::ArrangementsForYoung),
        Self::Info(ShelterField::ArrangementsForDisabled),
        Self::Info(ShelterField::ExpertAdviceFirst),
        Self::Info(ShelterField::ExpertAdviceNext),
        Self::Info(ShelterField::RejectReasons),
    ];

    pub const REPORT_DATA: [Self; 4] = [
        Self::Collect(AwaitedField::Photo),
        Self::Collect(AwaitedField::Diet),
        Self::Collect(AwaitedField::Behavior),
        Self::Collect(AwaitedField::WellBeing),
    ];

    pub const USER_DATA: [Self; 2] = [
        Self::Collect(AwaitedField::Phone),
        Self::Collect(AwaitedField::Email),
    ];

    /// Decode a callback token.
    ///
    /// Fixed tokens must match exactly. `SAVE_SHELTER` and `ASK_VOLUNTEER`
    /// take a decimal identifier right after the prefix; a missing or
    /// non-numeric suffix decodes to `None`.
    #[must_use]
    pub fn decode(token: &str) -> Option<Self> {
        if token == ASK_ANY_VOLUNTEER {
            return Some(Self::AskAnyVolunteer);
        }
        if let Some((field, ..)) = INFO.iter().find(|(_, t, _)| *t == token) {
            return Some(Self::Info(*field));
        }
        if let Some((field, ..)) = COLLECT.iter().find(|(_, t, _)| *t == token) {
            return Some(Self::Collect(*field));
        }
        if let Some(id) = numeric_suffix(token, SAVE_SHELTER) {
            return Some(Self::SaveShelter(id));
        }
        numeric_suffix(token, ASK_VOLUNTEER).map(Self::AskVolunteer)
    }

    /// The callback token for this command. Inverse of [`Command::decode`].
    #[must_use]
    pub fn token(self) -> String {
        match self {
            Self::Info(field) => info_entry(field).1.to_string(),
            Self::Collect(field) => collect_entry(field).1.to_string(),
            Self::SaveShelter(id) => format!("{SAVE_SHELTER}{id}"),
            Self::AskVolunteer(chat_id) => format!("{ASK_VOLUNTEER}{chat_id}"),
            Self::AskAnyVolunteer => ASK_ANY_VOLUNTEER.to_string(),
        }
    }

    /// Default button label. Shelter and volunteer buttons are usually
    /// labelled with a name instead.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Info(field) => info_entry(field).2,
            Self::Collect(field) => collect_entry(field).2,
            Self::SaveShelter(_) => "Choose this shelter",
            Self::AskVolunteer(_) => "Ask this volunteer",
            Self::AskAnyVolunteer => "Any free volunteer",
        }
    }
}

fn info_entry(field: ShelterField) -> (ShelterField, &'static str, &'static str) {
    match field {
        ShelterField::Address => INFO[0],
        ShelterField::Schedule => INFO[1],
        ShelterField::Scheme => INFO[2],
        ShelterField::Safety => INFO[3],
        ShelterField::Rules => INFO[4],
        ShelterField::Docs => INFO[5],
        ShelterField::Movement => INFO[6],
        ShelterField::Arrangements => INFO[7],
        ShelterField::ArrangementsForYoung => INFO[8],
        ShelterField::ArrangementsForDisabled => INFO[9],
        ShelterField::ExpertAdviceFirst => INFO[10],
        ShelterField::ExpertAdviceNext => INFO[11],
        ShelterField::RejectReasons => INFO[12],
    }
}

fn collect_entry(field: AwaitedField) -> (AwaitedField, &'static str, &'static str) {
    match field {
        AwaitedField::Phone => COLLECT[0],
        AwaitedField::Email => COLLECT[1],
        AwaitedField::Photo => COLLECT[2],
        AwaitedField::Diet => COLLECT[3],
        AwaitedField::Behavior => COLLECT[4],
        AwaitedField::WellBeing => COLLECT[5],
    }
}

fn numeric_suffix(token: &str, prefix: &str) -> Option<i64> {
    let digits = token.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("INF_ADDRESS", Command::Info(ShelterField::Address))]
    #[case("INF_SAFETY", Command::Info(ShelterField::Safety))]
    #[case("HOW_ARRANGE", Command::Info(ShelterField::Arrangements))]
    #[case("HOW_ARRANGE_YOUNG", Command::Info(ShelterField::ArrangementsForYoung))]
    #[case("HOW_REJECT_REASONS", Command::Info(ShelterField::RejectReasons))]
    #[case("SAVE_USER_PHONE", Command::Collect(AwaitedField::Phone))]
    #[case("SEND_WELL_BEING", Command::Collect(AwaitedField::WellBeing))]
    #[case("SAVE_SHELTER1", Command::SaveShelter(1))]
    #[case("SAVE_SHELTER42", Command::SaveShelter(42))]
    #[case("ASK_VOLUNTEER12", Command::AskVolunteer(12))]
    #[case("ASK_ANY_VOLUNTEER", Command::AskAnyVolunteer)]
    fn decodes_known_tokens(#[case] token: &str, #[case] expected: Command) {
        assert_eq!(Command::decode(token), Some(expected));
        assert_eq!(expected.token(), token);
    }

    #[rstest]
    #[case("")]
    #[case("UNKNOWN")]
    #[case("SAVE_SHELTER")]
    #[case("SAVE_SHELTERabc")]
    #[case("SAVE_SHELTER-1")]
    #[case("SAVE_SHELTER 1")]
    #[case("ASK_VOLUNTEER")]
    #[case("ASK_VOLUNTEER1x")]
    #[case("INF_ADDRESS1")]
    #[case("inf_address")]
    #[case("SAVE_SHELTER99999999999999999999")]
    fn rejects_malformed_tokens(#[case] token: &str) {
        assert_eq!(Command::decode(token), None);
    }

    #[test]
    fn every_fixed_token_round_trips() {
        let fixed = INFO
            .iter()
            .map(|(field, ..)| Command::Info(*field))
            .chain(COLLECT.iter().map(|(field, ..)| Command::Collect(*field)));
        for command in fixed {
            assert_eq!(Command::decode(&command.token()), Some(command));
            assert!(!command.label().is_empty());
        }
    }
}
