//! Routing of inline button presses.

use std::sync::Arc;

use {
    shelter_channels::OutboundAction,
    shelter_common::{AwaitedField, ChatId, ShelterField, User, UserPatch},
    shelter_service_traits::ServiceError,
    shelter_sessions::{PendingRequest, SessionStore},
    tracing::debug,
};

use crate::{command::Command, error::Result, menu, replies, services::Services};

pub struct CallbackRouter {
    services: Services,
    sessions: Arc<SessionStore>,
}

impl CallbackRouter {
    pub fn new(services: Services, sessions: Arc<SessionStore>) -> Self {
        Self { services, sessions }
    }

    /// Decide the replies for one button press. Unknown tokens yield nothing.
    pub async fn route(&self, chat_id: ChatId, data: &str) -> Result<Vec<OutboundAction>> {
        let Some(user) = self.services.registered_user(chat_id).await? else {
            return Ok(vec![menu::welcome(chat_id)]);
        };
        let Some(command) = Command::decode(data) else {
            debug!(chat_id, token = data, "unknown callback token");
            return Ok(Vec::new());
        };
        debug!(chat_id, ?command, "routing callback");

        match command {
            Command::Info(field) => self.shelter_info(&user, field).await,
            Command::SaveShelter(id) => self.save_shelter(&user, id).await,
            Command::Collect(field) => Ok(vec![self.collect(chat_id, field)]),
            Command::AskVolunteer(volunteer_chat) => {
                let volunteer = self
                    .services
                    .users
                    .find_by_chat(volunteer_chat)
                    .await?
                    .filter(|u| u.volunteer);
                match volunteer {
                    Some(volunteer) => Ok(vec![self.open_relay(chat_id, &volunteer)]),
                    None => Ok(vec![OutboundAction::text(
                        chat_id,
                        replies::VOLUNTEER_UNAVAILABLE,
                    )]),
                }
            },
            Command::AskAnyVolunteer => match self.services.users.find_any_free_volunteer().await? {
                Some(volunteer) => Ok(vec![self.open_relay(chat_id, &volunteer)]),
                None => Ok(vec![OutboundAction::text(chat_id, replies::NO_FREE_VOLUNTEERS)]),
            },
        }
    }

    async fn shelter_info(&self, user: &User, field: ShelterField) -> Result<Vec<OutboundAction>> {
        let shelter = match user.shelter_id {
            Some(id) => self.services.shelters.find_by_id(id).await?,
            None => None,
        };
        let text = match &shelter {
            Some(shelter) if shelter.field(field).is_empty() => replies::NO_INFO,
            Some(shelter) => shelter.field(field),
            None => replies::CHOOSE_SHELTER_FIRST,
        };
        Ok(vec![OutboundAction::text(user.chat_id, text)])
    }

    async fn save_shelter(&self, user: &User, shelter_id: i64) -> Result<Vec<OutboundAction>> {
        let chat_id = user.chat_id;
        if self.services.shelters.find_by_id(shelter_id).await?.is_none() {
            return Ok(vec![OutboundAction::text(chat_id, replies::SHELTER_UNAVAILABLE)]);
        }
        let patch = UserPatch {
            shelter_id: Some(shelter_id),
            ..Default::default()
        };
        match self.services.users.update(user, patch).await {
            Ok(_) => Ok(vec![
                OutboundAction::text(chat_id, replies::SHELTER_SELECTED)
                    .with_keyboard(menu::main_keyboard()),
            ]),
            Err(ServiceError::Validation { message }) => {
                Ok(vec![OutboundAction::text(chat_id, replies::error(&message))])
            },
            Err(ServiceError::NotFound { .. }) => {
                Ok(vec![OutboundAction::text(chat_id, replies::SHELTER_UNAVAILABLE)])
            },
            Err(e) => Err(e.into()),
        }
    }

    fn collect(&self, chat_id: ChatId, field: AwaitedField) -> OutboundAction {
        self.sessions
            .pending
            .put(PendingRequest::new(chat_id).expecting(field));
        OutboundAction::text(chat_id, replies::prompt(field))
    }

    fn open_relay(&self, chat_id: ChatId, volunteer: &User) -> OutboundAction {
        let question = self.sessions.relays.open(chat_id, volunteer.chat_id);
        debug!(
            chat_id,
            relay_id = question.id,
            volunteer_chat = volunteer.chat_id,
            "relay question opened"
        );
        OutboundAction::text(chat_id, replies::TYPE_QUESTION)
    }
}
