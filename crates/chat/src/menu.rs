//! Main menu entries and the keyboards attached to their responses.

use {
    shelter_channels::{InlineButton, Keyboard, OutboundAction},
    shelter_common::{ChatId, Shelter, User},
};

use crate::{command::Command, replies};

/// An entry of the persistent reply keyboard, matched by its exact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Menu {
    Start,
    SetShelter,
    GetInfo,
    GetAnimal,
    SendReport,
    SetUserData,
    AskVolunteer,
}

impl Menu {
    pub const ALL: [Self; 7] = [
        Self::Start,
        Self::SetShelter,
        Self::GetInfo,
        Self::GetAnimal,
        Self::SendReport,
        Self::SetUserData,
        Self::AskVolunteer,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "/start",
            Self::SetShelter => "Choose a shelter",
            Self::GetInfo => "Shelter info",
            Self::GetAnimal => "How to adopt",
            Self::SendReport => "Send a report",
            Self::SetUserData => "My contacts",
            Self::AskVolunteer => "Ask a volunteer",
        }
    }

    #[must_use]
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|menu| menu.label() == text)
    }

    #[must_use]
    pub fn response(self) -> &'static str {
        match self {
            Self::Start => "Hi! Choose a shelter to get started.",
            Self::SetShelter => "Choose a shelter",
            Self::GetInfo => "Shelter information",
            Self::GetAnimal => "How to adopt an animal",
            Self::SendReport => "What would you like to send?",
            Self::SetUserData => "Which details should we save?",
            Self::AskVolunteer => "Who would you like to ask?",
        }
    }

    /// Keyboard for entries whose buttons do not depend on stored data.
    #[must_use]
    pub fn static_keyboard(self) -> Option<Keyboard> {
        match self {
            Self::Start => Some(main_keyboard()),
            Self::GetInfo => Some(inline(&Command::SHELTER_INFO)),
            Self::GetAnimal => Some(inline(&Command::ANIMAL_INFO)),
            Self::SendReport => Some(inline(&Command::REPORT_DATA)),
            Self::SetUserData => Some(inline(&Command::USER_DATA)),
            Self::SetShelter | Self::AskVolunteer => None,
        }
    }
}

/// Persistent keyboard with every menu entry except `/start`, two per row.
#[must_use]
pub fn main_keyboard() -> Keyboard {
    let labels: Vec<String> = Menu::ALL
        .into_iter()
        .filter(|menu| *menu != Menu::Start)
        .map(|menu| menu.label().to_string())
        .collect();
    Keyboard::Reply(labels.chunks(2).map(<[String]>::to_vec).collect())
}

/// One button per row, labelled with each command's default label.
#[must_use]
pub fn inline(commands: &[Command]) -> Keyboard {
    Keyboard::Inline(
        commands
            .iter()
            .map(|command| vec![InlineButton::new(command.label(), command.token())])
            .collect(),
    )
}

/// One button per shelter, or `None` when there is nothing to choose.
#[must_use]
pub fn shelters_keyboard(shelters: &[Shelter]) -> Option<Keyboard> {
    if shelters.is_empty() {
        return None;
    }
    Some(Keyboard::Inline(
        shelters
            .iter()
            .map(|shelter| {
                let command = Command::SaveShelter(shelter.id);
                let label: &str = if shelter.name.is_empty() {
                    command.label()
                } else {
                    &shelter.name
                };
                vec![InlineButton::new(label, command.token())]
            })
            .collect(),
    ))
}

/// One button per volunteer followed by an "any free volunteer" row.
#[must_use]
pub fn volunteers_keyboard(volunteers: &[User]) -> Keyboard {
    let mut rows: Vec<Vec<InlineButton>> = volunteers
        .iter()
        .map(|volunteer| {
            let command = Command::AskVolunteer(volunteer.chat_id);
            let label: &str = if volunteer.name.is_empty() {
                command.label()
            } else {
                &volunteer.name
            };
            vec![InlineButton::new(label, command.token())]
        })
        .collect();
    let any = Command::AskAnyVolunteer;
    rows.push(vec![InlineButton::new(any.label(), any.token())]);
    Keyboard::Inline(rows)
}

/// First reply a chat ever receives.
#[must_use]
pub fn welcome(chat_id: ChatId) -> OutboundAction {
    OutboundAction::text(chat_id, Menu::Start.response()).with_keyboard(main_keyboard())
}

/// Fallback when there are no shelters to list.
#[must_use]
pub fn no_shelters(chat_id: ChatId) -> OutboundAction {
    OutboundAction::text(chat_id, replies::NO_SHELTERS).with_keyboard(main_keyboard())
}
