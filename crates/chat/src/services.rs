use std::sync::Arc;

use {
    shelter_common::{ChatId, User},
    shelter_service_traits::{ReportService, ShelterService, UserService},
    tracing::info,
};

use crate::error::Result;

/// Persistence collaborators the routers talk to.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserService>,
    pub shelters: Arc<dyn ShelterService>,
    pub reports: Arc<dyn ReportService>,
}

impl Services {
    pub fn new(
        users: Arc<dyn UserService>,
        shelters: Arc<dyn ShelterService>,
        reports: Arc<dyn ReportService>,
    ) -> Self {
        Self {
            users,
            shelters,
            reports,
        }
    }

    /// Use one backend for all three collaborators.
    pub fn from_directory<D>(directory: Arc<D>) -> Self
    where
        D: UserService + ShelterService + ReportService + 'static,
    {
        Self::new(
            Arc::clone(&directory) as Arc<dyn UserService>,
            Arc::clone(&directory) as Arc<dyn ShelterService>,
            directory,
        )
    }

    /// The user behind `chat_id`, or `None` on first contact.
    ///
    /// A first contact creates the user record, so the next event from the
    /// same chat finds it.
    pub async fn registered_user(&self, chat_id: ChatId) -> Result<Option<User>> {
        if let Some(user) = self.users.find_by_chat(chat_id).await? {
            return Ok(Some(user));
        }
        let user = self.users.create(chat_id).await?;
        info!(chat_id, user_id = user.id, "registered new chat");
        Ok(None)
    }
}
