use std::{
    collections::BTreeMap,
    sync::{
        RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use {
    async_trait::async_trait,
    chrono::Utc,
    shelter_common::{ChatId, NewReport, Report, ReportPatch, Shelter, User, UserPatch},
    shelter_service_traits::{
        ReportService, ServiceError, ServiceResult, ShelterService, UserService,
    },
    tracing::debug,
};

use crate::validate;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    shelters: BTreeMap<i64, Shelter>,
    reports: BTreeMap<i64, Report>,
    next_user_id: i64,
    next_report_id: i64,
}

impl Tables {
    fn user_by_chat(&self, chat_id: ChatId) -> Option<&User> {
        self.users.values().find(|u| u.chat_id == chat_id)
    }

    fn insert_user(&mut self, chat_id: ChatId, name: String, volunteer: bool) -> User {
        self.next_user_id += 1;
        let user = User {
            id: self.next_user_id,
            chat_id,
            name,
            volunteer,
            ..Default::default()
        };
        self.users.insert(user.id, user.clone());
        user
    }
}

/// Users, shelters and reports kept in process memory.
///
/// Implements every collaborator trait the chat routers use, with the same
/// field validation a persistence service would apply.
#[derive(Default)]
pub struct InMemoryDirectory {
    tables: RwLock<Tables>,
    /// Round-robin cursor for [`UserService::find_any_free_volunteer`].
    volunteer_cursor: AtomicUsize,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_shelters(self, shelters: impl IntoIterator<Item = Shelter>) -> Self {
        for shelter in shelters {
            self.add_shelter(shelter);
        }
        self
    }

    pub fn add_shelter(&self, shelter: Shelter) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.shelters.insert(shelter.id, shelter);
    }

    /// Register `chat_id` as a volunteer, promoting an existing user.
    pub fn add_volunteer(&self, chat_id: ChatId, name: impl Into<String>) -> User {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let existing = tables.user_by_chat(chat_id).map(|u| u.id);
        match existing.and_then(|id| tables.users.get_mut(&id)) {
            Some(user) => {
                user.volunteer = true;
                user.name = name.into();
                user.clone()
            },
            None => tables.insert_user(chat_id, name.into(), true),
        }
    }

    /// Record that the user in `chat_id` adopted `animal_id`.
    pub fn assign_animal(&self, chat_id: ChatId, animal_id: i64) -> Option<User> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let id = tables.user_by_chat(chat_id)?.id;
        let user = tables.users.get_mut(&id)?;
        user.animal_id = Some(animal_id);
        Some(user.clone())
    }

    #[must_use]
    pub fn user(&self, chat_id: ChatId) -> Option<User> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.user_by_chat(chat_id).cloned()
    }

    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.reports.values().cloned().collect()
    }
}

fn apply_report_patch(report: &mut Report, patch: ReportPatch) -> ServiceResult<()> {
    if let Some(photo) = patch.photo {
        validate::photo(&photo)?;
        report.photo = Some(photo);
    }
    if let Some(diet) = patch.diet {
        report.diet = Some(validate::report_text("diet", &diet)?);
    }
    if let Some(behavior) = patch.behavior {
        report.behavior = Some(validate::report_text("behavior", &behavior)?);
    }
    if let Some(well_being) = patch.well_being {
        report.well_being = Some(validate::report_text("well-being", &well_being)?);
    }
    Ok(())
}

#[async_trait]
impl UserService for InMemoryDirectory {
    async fn find_by_chat(&self, chat_id: ChatId) -> ServiceResult<Option<User>> {
        Ok(self.user(chat_id))
    }

    async fn create(&self, chat_id: ChatId) -> ServiceResult<User> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if let Some(user) = tables.user_by_chat(chat_id) {
            return Ok(user.clone());
        }
        let user = tables.insert_user(chat_id, String::new(), false);
        debug!(chat_id, user_id = user.id, "created user");
        Ok(user)
    }

    async fn update(&self, user: &User, patch: UserPatch) -> ServiceResult<User> {
        // Validate everything before touching the stored record.
        let phone = patch.phone.as_deref().map(validate::phone).transpose()?;
        let email = patch.email.as_deref().map(validate::email).transpose()?;

        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if let Some(shelter_id) = patch.shelter_id
            && !tables.shelters.contains_key(&shelter_id)
        {
            return Err(ServiceError::not_found("shelter", shelter_id));
        }
        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| ServiceError::not_found("user", user.id))?;
        if phone.is_some() {
            stored.phone = phone;
        }
        if email.is_some() {
            stored.email = email;
        }
        if patch.shelter_id.is_some() {
            stored.shelter_id = patch.shelter_id;
        }
        Ok(stored.clone())
    }

    async fn volunteers(&self) -> ServiceResult<Vec<User>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables.users.values().filter(|u| u.volunteer).cloned().collect())
    }

    async fn find_any_free_volunteer(&self) -> ServiceResult<Option<User>> {
        let volunteers = self.volunteers().await?;
        if volunteers.is_empty() {
            return Ok(None);
        }
        let turn = self.volunteer_cursor.fetch_add(1, Ordering::Relaxed) % volunteers.len();
        Ok(volunteers.into_iter().nth(turn))
    }
}

#[async_trait]
impl ShelterService for InMemoryDirectory {
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Shelter>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables.shelters.get(&id).cloned())
    }

    async fn all(&self) -> ServiceResult<Vec<Shelter>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables.shelters.values().cloned().collect())
    }
}

#[async_trait]
impl ReportService for InMemoryDirectory {
    async fn find_open_for_user_today(&self, user_id: i64) -> ServiceResult<Option<Report>> {
        let today = Utc::now().date_naive();
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables
            .reports
            .values()
            .find(|r| r.user_id == user_id && r.date == today)
            .cloned())
    }

    async fn create(&self, report: NewReport) -> ServiceResult<Report> {
        let mut created = Report {
            id: 0,
            user_id: report.user_id,
            animal_id: report.animal_id,
            date: Utc::now().date_naive(),
            photo: None,
            diet: None,
            behavior: None,
            well_being: None,
        };
        apply_report_patch(&mut created, report.patch)?;

        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if !tables.users.contains_key(&created.user_id) {
            return Err(ServiceError::not_found("user", created.user_id));
        }
        tables.next_report_id += 1;
        created.id = tables.next_report_id;
        tables.reports.insert(created.id, created.clone());
        debug!(report_id = created.id, user_id = created.user_id, "created report");
        Ok(created)
    }

    async fn update(&self, report: &Report, patch: ReportPatch) -> ServiceResult<Report> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let stored = tables
            .reports
            .get_mut(&report.id)
            .ok_or_else(|| ServiceError::not_found("report", report.id))?;
        let mut updated = stored.clone();
        apply_report_patch(&mut updated, patch)?;
        *stored = updated.clone();
        Ok(updated)
    }
}
