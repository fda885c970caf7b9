//! Routing of free-text and photo messages.

use std::sync::Arc;

use {
    shelter_channels::{AttachmentFetcher, FileRef, OutboundAction},
    shelter_common::{AwaitedField, ChatId, NewReport, ReportPatch, User, UserPatch},
    shelter_service_traits::{ServiceError, ServiceResult},
    shelter_sessions::{PendingRequest, RelayQuestion, SessionStore},
    tracing::{debug, warn},
};

use crate::{
    error::Result,
    menu::{self, Menu},
    replies,
    services::Services,
};

/// Borrowed view of an inbound message.
#[derive(Debug, Clone, Copy)]
pub struct TextMessage<'a> {
    pub chat_id: ChatId,
    pub text: Option<&'a str>,
    /// Text of the message this one replies to.
    pub reply_to_text: Option<&'a str>,
    pub attachment: Option<&'a FileRef>,
}

impl<'a> TextMessage<'a> {
    #[must_use]
    pub fn text(chat_id: ChatId, text: &'a str) -> Self {
        Self {
            chat_id,
            text: Some(text),
            reply_to_text: None,
            attachment: None,
        }
    }
}

/// A received value, ready for the collaborator that stores it.
enum FieldValue {
    User(UserPatch),
    Report(ReportPatch),
}

pub struct MessageRouter {
    services: Services,
    sessions: Arc<SessionStore>,
    attachments: Arc<dyn AttachmentFetcher>,
}

impl MessageRouter {
    pub fn new(
        services: Services,
        sessions: Arc<SessionStore>,
        attachments: Arc<dyn AttachmentFetcher>,
    ) -> Self {
        Self {
            services,
            sessions,
            attachments,
        }
    }

    /// Decide the replies for one message.
    ///
    /// In order: first contact, menu label, pending field, the assigned
    /// volunteer's threaded reply to a relayed question, open relay
    /// question. Anything else is ignored.
    pub async fn route(&self, message: TextMessage<'_>) -> Result<Vec<OutboundAction>> {
        let chat_id = message.chat_id;
        let Some(user) = self.services.registered_user(chat_id).await? else {
            return Ok(vec![menu::welcome(chat_id)]);
        };

        if let Some(entry) = message.text.and_then(Menu::from_label) {
            debug!(chat_id, menu = ?entry, "menu selected");
            return self.menu_response(chat_id, entry).await;
        }

        if let Some(request) = self.sessions.pending.get(chat_id)
            && let Some(field) = request.awaited()
        {
            return self.fill_pending(&user, message, request, field).await;
        }

        if let Some(question) = self.replied_question(message) {
            return Ok(self.answer_relay(&question, message));
        }

        if let Some(question) = self.sessions.relays.by_user_chat(chat_id) {
            let Some(text) = message.text else {
                return Ok(vec![OutboundAction::text(chat_id, replies::EXPECTED_TEXT)]);
            };
            debug!(
                chat_id,
                relay_id = question.id,
                volunteer_chat = question.volunteer_chat,
                "relaying question"
            );
            return Ok(vec![
                OutboundAction::text(
                    question.volunteer_chat,
                    replies::relay_to_volunteer(question.id, text),
                ),
                OutboundAction::text(chat_id, replies::QUESTION_SENT),
            ]);
        }

        debug!(chat_id, "nothing to do for message");
        Ok(Vec::new())
    }

    async fn menu_response(&self, chat_id: ChatId, entry: Menu) -> Result<Vec<OutboundAction>> {
        let action = match entry {
            Menu::SetShelter => {
                let shelters = self.services.shelters.all().await?;
                match menu::shelters_keyboard(&shelters) {
                    Some(keyboard) => {
                        OutboundAction::text(chat_id, entry.response()).with_keyboard(keyboard)
                    },
                    None => menu::no_shelters(chat_id),
                }
            },
            Menu::AskVolunteer => {
                let volunteers = self.services.users.volunteers().await?;
                OutboundAction::text(chat_id, entry.response())
                    .with_keyboard(menu::volunteers_keyboard(&volunteers))
            },
            Menu::Start
            | Menu::GetInfo
            | Menu::GetAnimal
            | Menu::SendReport
            | Menu::SetUserData => {
                let action = OutboundAction::text(chat_id, entry.response());
                match entry.static_keyboard() {
                    Some(keyboard) => action.with_keyboard(keyboard),
                    None => action.with_keyboard(menu::main_keyboard()),
                }
            },
        };
        Ok(vec![action])
    }

    async fn fill_pending(
        &self,
        user: &User,
        message: TextMessage<'_>,
        request: PendingRequest,
        field: AwaitedField,
    ) -> Result<Vec<OutboundAction>> {
        let chat_id = message.chat_id;
        let value = match self.read_value(field, message).await {
            Ok(value) => value,
            Err(hint) => return Ok(vec![OutboundAction::text(chat_id, hint)]),
        };

        let (saved, stored) = match value {
            FieldValue::User(patch) => (
                replies::CONTACT_SAVED,
                self.services.users.update(user, patch).await.map(drop),
            ),
            FieldValue::Report(patch) => (replies::REPORT_SAVED, self.save_report(user, patch).await),
        };

        match stored {
            Ok(()) => {
                // A request replaced while the value was being stored stays.
                self.sessions
                    .pending
                    .remove_if(chat_id, |current| *current == request);
                debug!(chat_id, %field, "pending field stored");
                Ok(vec![OutboundAction::text(chat_id, saved)])
            },
            Err(ServiceError::Validation { message }) => {
                debug!(chat_id, %field, %message, "value rejected, still waiting");
                Ok(vec![OutboundAction::text(chat_id, replies::error(&message))])
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Extract the awaited value from the message, or a hint to send back.
    async fn read_value(
        &self,
        field: AwaitedField,
        message: TextMessage<'_>,
    ) -> std::result::Result<FieldValue, &'static str> {
        let text = || {
            message
                .text
                .map(str::to_string)
                .ok_or(replies::EXPECTED_TEXT)
        };
        Ok(match field {
            AwaitedField::Phone => FieldValue::User(UserPatch {
                phone: Some(text()?),
                ..Default::default()
            }),
            AwaitedField::Email => FieldValue::User(UserPatch {
                email: Some(text()?),
                ..Default::default()
            }),
            AwaitedField::Photo => FieldValue::Report(ReportPatch {
                photo: Some(self.download_photo(message).await?),
                ..Default::default()
            }),
            AwaitedField::Diet => FieldValue::Report(ReportPatch {
                diet: Some(text()?),
                ..Default::default()
            }),
            AwaitedField::Behavior => FieldValue::Report(ReportPatch {
                behavior: Some(text()?),
                ..Default::default()
            }),
            AwaitedField::WellBeing => FieldValue::Report(ReportPatch {
                well_being: Some(text()?),
                ..Default::default()
            }),
        })
    }

    async fn download_photo(
        &self,
        message: TextMessage<'_>,
    ) -> std::result::Result<Vec<u8>, &'static str> {
        let file = message.attachment.ok_or(replies::EXPECTED_PHOTO)?;
        self.attachments.fetch(file).await.map_err(|e| {
            warn!(chat_id = message.chat_id, file = file.as_str(), error = %e, "failed to download photo");
            replies::PHOTO_DOWNLOAD_FAILED
        })
    }

    /// Merge `patch` into today's report, creating it if needed.
    async fn save_report(&self, user: &User, patch: ReportPatch) -> ServiceResult<()> {
        let reports = &self.services.reports;
        match reports.find_open_for_user_today(user.id).await? {
            Some(report) => {
                reports.update(&report, patch).await?;
            },
            None => {
                reports
                    .create(NewReport {
                        user_id: user.id,
                        animal_id: user.animal_id,
                        patch,
                    })
                    .await?;
            },
        }
        Ok(())
    }

    /// The open question this message answers, when it quotes a forwarded
    /// question and comes from the volunteer it was assigned to.
    fn replied_question(&self, message: TextMessage<'_>) -> Option<RelayQuestion> {
        let id = message.reply_to_text.and_then(replies::parse_relay_id)?;
        let Some(question) = self.sessions.relays.by_id(id) else {
            debug!(relay_id = id, chat_id = message.chat_id, "reply to unknown relay question");
            return None;
        };
        if question.volunteer_chat != message.chat_id {
            debug!(
                relay_id = id,
                chat_id = message.chat_id,
                volunteer_chat = question.volunteer_chat,
                "reply from a chat the question was not sent to"
            );
            return None;
        }
        Some(question)
    }

    /// The assigned volunteer answered a relayed question by replying to it.
    fn answer_relay(
        &self,
        question: &RelayQuestion,
        message: TextMessage<'_>,
    ) -> Vec<OutboundAction> {
        let Some(text) = message.text else {
            return vec![OutboundAction::text(message.chat_id, replies::EXPECTED_TEXT)];
        };
        // Answered concurrently by another reply.
        if self.sessions.relays.close(question.id).is_none() {
            return Vec::new();
        }
        debug!(
            relay_id = question.id,
            user_chat = question.user_chat,
            volunteer_chat = question.volunteer_chat,
            "volunteer answered"
        );
        vec![OutboundAction::text(
            question.user_chat,
            replies::volunteer_answer(text),
        )]
    }
}
