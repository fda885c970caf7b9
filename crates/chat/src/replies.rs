//! Fixed reply texts and the relay message format.

use shelter_common::AwaitedField;

pub const CONTACT_SAVED: &str = "Thanks, your contact details are saved.";
pub const REPORT_SAVED: &str = "Thanks, today's report is updated.";
pub const TYPE_QUESTION: &str = "Type your question and we will pass it on.";
pub const QUESTION_SENT: &str = "Your question was sent to a volunteer. The answer will arrive here.";
pub const NO_FREE_VOLUNTEERS: &str = "No volunteers are free right now, please try again later.";
pub const VOLUNTEER_UNAVAILABLE: &str = "This volunteer is not available anymore.";
pub const SHELTER_SELECTED: &str = "Shelter selected.";
pub const SHELTER_UNAVAILABLE: &str = "This shelter is not available anymore.";
pub const CHOOSE_SHELTER_FIRST: &str = "Choose a shelter first.";
pub const NO_SHELTERS: &str = "There are no shelters to choose from yet.";
pub const NO_INFO: &str = "The shelter has not shared this yet.";
pub const EXPECTED_TEXT: &str = "Please send this as a text message.";
pub const EXPECTED_PHOTO: &str = "Please send a photo.";
pub const PHOTO_DOWNLOAD_FAILED: &str = "Could not download the photo, please send it again.";

/// User-facing text for a rejected value.
#[must_use]
pub fn error(message: &str) -> String {
    format!("Something went wrong: {message}")
}

/// Follows the relay id in a forwarded question.
const RELAY_MARKER: &str = ": Message from a visitor, reply to this message to answer:\n";

/// What the volunteer sees. The leading id lets a threaded reply find the
/// question again.
#[must_use]
pub fn relay_to_volunteer(id: u64, text: &str) -> String {
    format!("{id}{RELAY_MARKER} {text}")
}

#[must_use]
pub fn volunteer_answer(text: &str) -> String {
    format!("Volunteer's answer:\n{text}")
}

/// Relay id of a forwarded question, if `text` is one.
#[must_use]
pub fn parse_relay_id(text: &str) -> Option<u64> {
    let (id, _) = text.split_once(RELAY_MARKER)?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// Prompt naming the field the bot now waits for.
#[must_use]
pub fn prompt(field: AwaitedField) -> &'static str {
    match field {
        AwaitedField::Phone => "Send your phone number, for example +79511338877.",
        AwaitedField::Email => "Send your email address.",
        AwaitedField::Photo => "Send a photo of your pet.",
        AwaitedField::Diet => "Describe your pet's diet today.",
        AwaitedField::Behavior => "Describe your pet's behavior today.",
        AwaitedField::WellBeing => "Describe your pet's well-being today.",
    }
}
