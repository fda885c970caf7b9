//! Service trait interfaces for the persistence collaborators.
//!
//! The chat routers only talk to users, shelters and reports through these
//! traits. Storage and business validation live behind them.

use {
    async_trait::async_trait,
    shelter_common::{ChatId, NewReport, Report, ReportPatch, Shelter, User, UserPatch},
};

/// Error type returned by service methods.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A supplied field value was rejected. The message is shown to the user.
    #[error("{message}")]
    Validation { message: String },
    /// The referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{message}")]
    Message { message: String },
}

impl ServiceError {
    #[must_use]
    pub fn validation(message: impl std::fmt::Display) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    #[must_use]
    pub fn message(message: impl std::fmt::Display) -> Self {
        Self::Message {
            message: message.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// ── Users ───────────────────────────────────────────────────────────────────

#[async_trait]
pub trait UserService: Send + Sync {
    async fn find_by_chat(&self, chat_id: ChatId) -> ServiceResult<Option<User>>;
    async fn create(&self, chat_id: ChatId) -> ServiceResult<User>;
    async fn update(&self, user: &User, patch: UserPatch) -> ServiceResult<User>;
    async fn volunteers(&self) -> ServiceResult<Vec<User>>;
    async fn find_any_free_volunteer(&self) -> ServiceResult<Option<User>>;
}

// ── Shelters ────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ShelterService: Send + Sync {
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Shelter>>;
    async fn all(&self) -> ServiceResult<Vec<Shelter>>;
}

// ── Reports ─────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Today's report of this user, if one was started already.
    async fn find_open_for_user_today(&self, user_id: i64) -> ServiceResult<Option<Report>>;
    async fn create(&self, report: NewReport) -> ServiceResult<Report>;
    async fn update(&self, report: &Report, patch: ReportPatch) -> ServiceResult<Report>;
}
