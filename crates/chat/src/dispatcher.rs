use std::sync::Arc;

use {
    shelter_channels::{AttachmentFetcher, ChatOutbound, InboundEvent, OutboundAction},
    shelter_sessions::SessionStore,
    tracing::{debug, error, warn},
};

use crate::{
    callback::CallbackRouter,
    error::Result,
    message::{MessageRouter, TextMessage},
    services::Services,
};

/// Outcome of one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub events: usize,
    /// Events whose routing failed; their actions were discarded.
    pub failed: usize,
    pub delivered: usize,
    pub undelivered: usize,
}

impl BatchReport {
    /// Always true: failed events are logged and dropped, never redelivered.
    #[must_use]
    pub fn acknowledged(&self) -> bool {
        true
    }
}

/// Routes inbound events and delivers the resulting actions.
///
/// Owns the session store shared by both routers.
pub struct Dispatcher {
    messages: MessageRouter,
    callbacks: CallbackRouter,
    outbound: Arc<dyn ChatOutbound>,
    sessions: Arc<SessionStore>,
}

impl Dispatcher {
    pub fn new(
        services: Services,
        attachments: Arc<dyn AttachmentFetcher>,
        outbound: Arc<dyn ChatOutbound>,
    ) -> Self {
        Self::with_sessions(services, attachments, outbound, SessionStore::shared())
    }

    pub fn with_sessions(
        services: Services,
        attachments: Arc<dyn AttachmentFetcher>,
        outbound: Arc<dyn ChatOutbound>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            messages: MessageRouter::new(services.clone(), Arc::clone(&sessions), attachments),
            callbacks: CallbackRouter::new(services, Arc::clone(&sessions)),
            outbound,
            sessions,
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Route a single event without delivering anything.
    pub async fn route(&self, event: &InboundEvent) -> Result<Vec<OutboundAction>> {
        match event {
            InboundEvent::Message {
                chat_id,
                text,
                reply_to_text,
                attachment,
            } => {
                self.messages
                    .route(TextMessage {
                        chat_id: *chat_id,
                        text: text.as_deref(),
                        reply_to_text: reply_to_text.as_deref(),
                        attachment: attachment.as_ref(),
                    })
                    .await
            },
            InboundEvent::Callback { chat_id, data } => self.callbacks.route(*chat_id, data).await,
        }
    }

    /// Process a batch in input order.
    ///
    /// A failing event is logged and skipped; its siblings still run.
    /// Delivery failures are logged and do not undo session changes.
    pub async fn process(&self, batch: &[InboundEvent]) -> BatchReport {
        let mut report = BatchReport {
            events: batch.len(),
            ..Default::default()
        };
        for event in batch {
            let chat_id = event.chat_id();
            let actions = match self.route(event).await {
                Ok(actions) => actions,
                Err(e) => {
                    error!(chat_id, event = event.kind(), error = %e, "failed to process event");
                    report.failed += 1;
                    continue;
                },
            };
            debug!(chat_id, event = event.kind(), actions = actions.len(), "event routed");
            for action in &actions {
                match self.outbound.send(action).await {
                    Ok(()) => report.delivered += 1,
                    Err(e) => {
                        warn!(chat_id = action.chat_id, error = %e, "failed to deliver reply");
                        report.undelivered += 1;
                    },
                }
            }
        }
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Mutex;

    use {
        async_trait::async_trait,
        shelter_channels::{FileRef, Keyboard},
        shelter_common::{AwaitedField, ChatId, Shelter},
        shelter_directory::InMemoryDirectory,
        shelter_service_traits::{
            ReportService, ServiceError, ServiceResult, ShelterService, UserService,
        },
        shelter_sessions::PendingRequest,
    };

    use {
        super::*,
        crate::{command::Command, menu::Menu, replies},
    };

    const VISITOR: ChatId = 11;
    const VOLUNTEER: ChatId = 12;
    const OTHER: ChatId = 21;

    /// Records every delivered action; fails for chats in `unreachable`.
    #[derive(Default)]
    struct RecordingOutbound {
        sent: Mutex<Vec<OutboundAction>>,
        unreachable: Vec<ChatId>,
    }

    impl RecordingOutbound {
        fn sent(&self) -> Vec<OutboundAction> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatOutbound for RecordingOutbound {
        async fn send(&self, action: &OutboundAction) -> shelter_channels::Result<()> {
            if self.unreachable.contains(&action.chat_id) {
                return Err(shelter_channels::Error::chat_unreachable(
                    action.chat_id,
                    "bot was blocked by the user",
                ));
            }
            self.sent.lock().unwrap().push(action.clone());
            Ok(())
        }
    }

    /// Serves fixed bytes for every file, or fails when empty.
    struct StaticAttachments(Vec<u8>);

    #[async_trait]
    impl AttachmentFetcher for StaticAttachments {
        async fn fetch(&self, file: &FileRef) -> shelter_channels::Result<Vec<u8>> {
            if self.0.is_empty() {
                return Err(shelter_channels::Error::unavailable(format!(
                    "file {} is gone",
                    file.as_str()
                )));
            }
            Ok(self.0.clone())
        }
    }

    struct Harness {
        directory: Arc<InMemoryDirectory>,
        dispatcher: Dispatcher,
    }

    impl Harness {
        fn build(photo: Vec<u8>) -> Self {
            let directory = Arc::new(InMemoryDirectory::new().with_shelters([Shelter {
                id: 1,
                name: "Dogs".into(),
                address: "1 Kennel Road".into(),
                ..Default::default()
            }]));
            let dispatcher = Dispatcher::new(
                Services::from_directory(Arc::clone(&directory)),
                Arc::new(StaticAttachments(photo)),
                Arc::new(RecordingOutbound::default()),
            );
            Self {
                directory,
                dispatcher,
            }
        }

        /// A harness where the visitor already talked to the bot once.
        async fn new() -> Self {
            let harness = Self::build(vec![0xff, 0xd8]);
            UserService::create(&*harness.directory, VISITOR).await.unwrap();
            harness
        }

        async fn route(&self, event: InboundEvent) -> Vec<OutboundAction> {
            self.dispatcher.route(&event).await.unwrap()
        }

        fn pending(&self) -> Option<PendingRequest> {
            self.dispatcher.sessions().pending.get(VISITOR)
        }
    }

    fn reply(chat_id: ChatId, text: &str, reply_to_text: &str) -> InboundEvent {
        InboundEvent::Message {
            chat_id,
            text: Some(text.into()),
            reply_to_text: Some(reply_to_text.into()),
            attachment: None,
        }
    }

    fn photo(chat_id: ChatId) -> InboundEvent {
        InboundEvent::Message {
            chat_id,
            text: None,
            reply_to_text: None,
            attachment: Some(FileRef::new("photo-1")),
        }
    }

    #[tokio::test]
    async fn first_contact_creates_user_and_welcomes() {
        let harness = Harness::build(Vec::new());
        let actions = harness.route(InboundEvent::text(VISITOR, "hello")).await;

        assert_eq!(actions, vec![crate::menu::welcome(VISITOR)]);
        assert!(harness.directory.user(VISITOR).is_some());

        // The second message is routed normally.
        assert!(harness.route(InboundEvent::text(VISITOR, "hello")).await.is_empty());
    }

    #[tokio::test]
    async fn first_contact_by_callback_welcomes() {
        let harness = Harness::build(Vec::new());
        let actions = harness.route(InboundEvent::callback(VISITOR, "SEND_DIET")).await;
        assert_eq!(actions, vec![crate::menu::welcome(VISITOR)]);
        assert!(harness.pending().is_none());
    }

    #[tokio::test]
    async fn every_menu_label_gets_a_keyboard() {
        let harness = Harness::new().await;
        for entry in Menu::ALL {
            let actions = harness.route(InboundEvent::text(VISITOR, entry.label())).await;
            assert!(!actions.is_empty(), "{entry:?}");
            assert!(
                actions
                    .iter()
                    .any(|a| a.keyboard.as_ref().is_some_and(|k| !k.is_empty())),
                "{entry:?} has no keyboard"
            );
        }
    }

    #[tokio::test]
    async fn empty_shelter_list_falls_back_to_main_keyboard() {
        let empty = Arc::new(InMemoryDirectory::new());
        UserService::create(&*empty, VISITOR).await.unwrap();
        let dispatcher = Dispatcher::new(
            Services::from_directory(empty),
            Arc::new(StaticAttachments(Vec::new())),
            Arc::new(RecordingOutbound::default()),
        );
        let actions = dispatcher
            .route(&InboundEvent::text(VISITOR, Menu::SetShelter.label()))
            .await
            .unwrap();
        assert_eq!(actions, vec![crate::menu::no_shelters(VISITOR)]);
    }

    #[tokio::test]
    async fn unrecognized_text_yields_nothing() {
        let harness = Harness::new().await;
        assert!(harness.route(InboundEvent::text(VISITOR, "what?")).await.is_empty());
        assert!(harness.route(reply(VISITOR, "what?", "no id here")).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_callback_yields_nothing() {
        let harness = Harness::new().await;
        assert!(harness.route(InboundEvent::callback(VISITOR, "NOPE")).await.is_empty());
        assert!(harness.route(InboundEvent::callback(VISITOR, "SAVE_SHELTERx")).await.is_empty());
    }

    #[tokio::test]
    async fn select_shelter_then_read_info() {
        let harness = Harness::new().await;

        let before = harness
            .route(InboundEvent::callback(VISITOR, "INF_ADDRESS"))
            .await;
        assert_eq!(before[0].text, replies::CHOOSE_SHELTER_FIRST);

        let selected = harness
            .route(InboundEvent::callback(VISITOR, "SAVE_SHELTER1"))
            .await;
        assert_eq!(selected[0].text, replies::SHELTER_SELECTED);
        assert!(matches!(selected[0].keyboard, Some(Keyboard::Reply(_))));
        assert_eq!(harness.directory.user(VISITOR).unwrap().shelter_id, Some(1));

        let address = harness
            .route(InboundEvent::callback(VISITOR, "INF_ADDRESS"))
            .await;
        assert_eq!(address, vec![OutboundAction::text(VISITOR, "1 Kennel Road")]);

        let docs = harness.route(InboundEvent::callback(VISITOR, "HOW_DOCS")).await;
        assert_eq!(docs[0].text, replies::NO_INFO);
    }

    #[tokio::test]
    async fn selecting_missing_shelter_is_neutral() {
        let harness = Harness::new().await;
        let actions = harness
            .route(InboundEvent::callback(VISITOR, "SAVE_SHELTER9"))
            .await;
        assert_eq!(actions, vec![OutboundAction::text(
            VISITOR,
            replies::SHELTER_UNAVAILABLE
        )]);
        assert!(harness.directory.user(VISITOR).unwrap().shelter_id.is_none());
    }

    #[tokio::test]
    async fn collected_contact_consumes_pending_request() {
        let harness = Harness::new().await;

        let prompt = harness
            .route(InboundEvent::callback(VISITOR, "SAVE_USER_PHONE"))
            .await;
        assert_eq!(prompt[0].text, replies::prompt(AwaitedField::Phone));
        assert!(harness.pending().unwrap().is_expected(AwaitedField::Phone));

        let saved = harness
            .route(InboundEvent::text(VISITOR, "+79511338877"))
            .await;
        assert_eq!(saved, vec![OutboundAction::text(VISITOR, replies::CONTACT_SAVED)]);
        assert!(harness.pending().is_none());
        assert_eq!(
            harness.directory.user(VISITOR).unwrap().phone.as_deref(),
            Some("+79511338877")
        );
    }

    #[tokio::test]
    async fn rejected_value_keeps_pending_request_for_retry() {
        let harness = Harness::new().await;
        harness
            .route(InboundEvent::callback(VISITOR, "SAVE_USER_EMAIL"))
            .await;

        let rejected = harness.route(InboundEvent::text(VISITOR, "11@ru")).await;
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].text.starts_with("Something went wrong: "));
        assert!(rejected[0].text.contains("invalid email"));
        assert!(harness.pending().unwrap().is_expected(AwaitedField::Email));

        let saved = harness
            .route(InboundEvent::text(VISITOR, "visitor@example.com"))
            .await;
        assert_eq!(saved[0].text, replies::CONTACT_SAVED);
        assert!(harness.pending().is_none());
        assert_eq!(
            harness.directory.user(VISITOR).unwrap().email.as_deref(),
            Some("visitor@example.com")
        );
    }

    #[tokio::test]
    async fn report_fields_fill_one_report_per_day() {
        let harness = Harness::new().await;
        harness.directory.assign_animal(VISITOR, 5);

        harness.route(InboundEvent::callback(VISITOR, "SEND_DIET")).await;
        let saved = harness.route(InboundEvent::text(VISITOR, "dry food")).await;
        assert_eq!(saved[0].text, replies::REPORT_SAVED);

        harness.route(InboundEvent::callback(VISITOR, "SEND_PHOTO")).await;
        let hint = harness.route(InboundEvent::text(VISITOR, "here")).await;
        assert_eq!(hint[0].text, replies::EXPECTED_PHOTO);
        assert!(harness.pending().is_some());

        let saved = harness.route(photo(VISITOR)).await;
        assert_eq!(saved[0].text, replies::REPORT_SAVED);
        assert!(harness.pending().is_none());

        let reports = harness.directory.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].animal_id, Some(5));
        assert_eq!(reports[0].diet.as_deref(), Some("dry food"));
        assert_eq!(reports[0].photo.as_deref(), Some(&[0xff, 0xd8][..]));
    }

    #[tokio::test]
    async fn rejected_report_text_keeps_pending_request() {
        let harness = Harness::new().await;
        harness.route(InboundEvent::callback(VISITOR, "SEND_DIET")).await;

        let rejected = harness.route(InboundEvent::text(VISITOR, "   ")).await;
        assert_eq!(rejected, vec![OutboundAction::text(
            VISITOR,
            replies::error("diet must not be empty")
        )]);
        assert!(harness.pending().unwrap().is_expected(AwaitedField::Diet));
        assert!(harness.directory.reports().is_empty());

        let saved = harness.route(InboundEvent::text(VISITOR, "wet food")).await;
        assert_eq!(saved[0].text, replies::REPORT_SAVED);
        assert!(harness.pending().is_none());
    }

    #[tokio::test]
    async fn failed_photo_download_keeps_waiting() {
        let harness = Harness::build(Vec::new());
        UserService::create(&*harness.directory, VISITOR).await.unwrap();
        harness.route(InboundEvent::callback(VISITOR, "SEND_PHOTO")).await;

        let hint = harness.route(photo(VISITOR)).await;
        assert_eq!(hint, vec![OutboundAction::text(
            VISITOR,
            replies::PHOTO_DOWNLOAD_FAILED
        )]);
        assert!(harness.pending().unwrap().is_expected(AwaitedField::Photo));
        assert!(harness.directory.reports().is_empty());
    }

    #[tokio::test]
    async fn menu_label_wins_over_pending_request() {
        let harness = Harness::new().await;
        harness.route(InboundEvent::callback(VISITOR, "SEND_DIET")).await;
        let actions = harness
            .route(InboundEvent::text(VISITOR, Menu::GetInfo.label()))
            .await;
        assert_eq!(actions[0].text, Menu::GetInfo.response());
        assert!(harness.pending().is_some());
    }

    #[tokio::test]
    async fn no_free_volunteer_yields_one_action_and_no_relay() {
        let harness = Harness::new().await;
        let actions = harness
            .route(InboundEvent::callback(VISITOR, "ASK_ANY_VOLUNTEER"))
            .await;
        assert_eq!(actions, vec![OutboundAction::text(
            VISITOR,
            replies::NO_FREE_VOLUNTEERS
        )]);
        assert!(harness.dispatcher.sessions().relays.is_empty());
    }

    #[tokio::test]
    async fn asking_a_non_volunteer_opens_no_relay() {
        let harness = Harness::new().await;
        UserService::create(&*harness.directory, VOLUNTEER).await.unwrap();
        let token = Command::AskVolunteer(VOLUNTEER).token();
        let actions = harness.route(InboundEvent::callback(VISITOR, token)).await;
        assert_eq!(actions[0].text, replies::VOLUNTEER_UNAVAILABLE);
        assert!(harness.dispatcher.sessions().relays.is_empty());
    }

    #[tokio::test]
    async fn relayed_question_and_threaded_answer() {
        let harness = Harness::new().await;
        harness.directory.add_volunteer(VOLUNTEER, "Ann");

        let prompt = harness
            .route(InboundEvent::callback(VISITOR, "ASK_VOLUNTEER12"))
            .await;
        assert_eq!(prompt, vec![OutboundAction::text(VISITOR, replies::TYPE_QUESTION)]);

        let relayed = harness
            .route(InboundEvent::text(VISITOR, "Can I visit on Sunday?"))
            .await;
        assert_eq!(relayed.len(), 2);
        assert_eq!(relayed[0].chat_id, VOLUNTEER);
        assert!(relayed[0].text.contains("Can I visit on Sunday?"));
        let id = replies::parse_relay_id(&relayed[0].text).unwrap();
        assert_eq!(relayed[1], OutboundAction::text(VISITOR, replies::QUESTION_SENT));

        let answer = harness
            .route(reply(VOLUNTEER, "Yes, 10 to 16.", &relayed[0].text))
            .await;
        assert_eq!(answer, vec![OutboundAction::text(
            VISITOR,
            replies::volunteer_answer("Yes, 10 to 16.")
        )]);
        assert!(harness.dispatcher.sessions().relays.by_id(id).is_none());

        // Answering twice finds nothing.
        assert!(
            harness
                .route(reply(VOLUNTEER, "Again", &relayed[0].text))
                .await
                .is_empty()
        );
    }

    /// Visitor asks `VOLUNTEER` a question; returns the forwarded text.
    async fn open_question(harness: &Harness, question: &str) -> String {
        harness.directory.add_volunteer(VOLUNTEER, "Ann");
        harness
            .route(InboundEvent::callback(VISITOR, "ASK_VOLUNTEER12"))
            .await;
        let relayed = harness.route(InboundEvent::text(VISITOR, question)).await;
        relayed[0].text.clone()
    }

    #[tokio::test]
    async fn only_the_assigned_volunteer_answers_a_question() {
        let harness = Harness::new().await;
        UserService::create(&*harness.directory, OTHER).await.unwrap();
        let forwarded = open_question(&harness, "private question").await;

        // Quoting the forwarded text or forging its id both stay silent.
        for quoted in [forwarded.as_str(), "1: my own note"] {
            let actions = harness.route(reply(OTHER, "spam", quoted)).await;
            assert!(actions.is_empty(), "{actions:?}");
        }
        assert!(
            harness
                .dispatcher
                .sessions()
                .relays
                .by_user_chat(VISITOR)
                .is_some()
        );
    }

    #[tokio::test]
    async fn visitor_threaded_reply_is_still_relayed() {
        let harness = Harness::new().await;
        let forwarded = open_question(&harness, "Can I visit?").await;

        for quoted in ["10:00 - 18:00", forwarded.as_str()] {
            let actions = harness
                .route(reply(VISITOR, "Is Rex still there?", quoted))
                .await;
            assert_eq!(actions.len(), 2);
            assert_eq!(actions[0].chat_id, VOLUNTEER);
            assert!(actions[0].text.ends_with("Is Rex still there?"));
            assert_eq!(actions[1], OutboundAction::text(VISITOR, replies::QUESTION_SENT));
        }
    }

    #[tokio::test]
    async fn any_volunteer_routes_to_a_registered_volunteer() {
        let harness = Harness::new().await;
        harness.directory.add_volunteer(VOLUNTEER, "Ann");
        harness
            .route(InboundEvent::callback(VISITOR, "ASK_ANY_VOLUNTEER"))
            .await;
        let question = harness.dispatcher.sessions().relays.by_user_chat(VISITOR).unwrap();
        assert_eq!(question.volunteer_chat, VOLUNTEER);
    }

    struct BrokenShelters;

    #[async_trait]
    impl ShelterService for BrokenShelters {
        async fn find_by_id(&self, _id: i64) -> ServiceResult<Option<Shelter>> {
            Err(ServiceError::message("database is down"))
        }

        async fn all(&self) -> ServiceResult<Vec<Shelter>> {
            Err(ServiceError::message("database is down"))
        }
    }

    #[tokio::test]
    async fn batch_continues_after_failures() {
        let directory = Arc::new(InMemoryDirectory::new());
        UserService::create(&*directory, VISITOR).await.unwrap();
        directory.add_volunteer(VOLUNTEER, "Ann");
        let outbound = Arc::new(RecordingOutbound {
            unreachable: vec![VOLUNTEER],
            ..Default::default()
        });
        let services = Services::new(
            Arc::clone(&directory) as Arc<dyn UserService>,
            Arc::new(BrokenShelters),
            Arc::clone(&directory) as Arc<dyn ReportService>,
        );
        let dispatcher = Dispatcher::new(
            services,
            Arc::new(StaticAttachments(Vec::new())),
            Arc::clone(&outbound) as Arc<dyn ChatOutbound>,
        );

        let batch = [
            InboundEvent::text(VISITOR, Menu::SetShelter.label()),
            InboundEvent::callback(VISITOR, "ASK_VOLUNTEER12"),
            InboundEvent::text(VISITOR, "Is the shelter open?"),
        ];
        let report = dispatcher.process(&batch).await;

        assert_eq!(report, BatchReport {
            events: 3,
            failed: 1,
            delivered: 2,
            undelivered: 1,
        });
        assert!(report.acknowledged());

        let sent: Vec<_> = outbound.sent().into_iter().map(|a| a.text).collect();
        assert_eq!(sent, vec![replies::TYPE_QUESTION, replies::QUESTION_SENT]);
        // The failed delivery to the volunteer does not close the question.
        assert!(dispatcher.sessions().relays.by_user_chat(VISITOR).is_some());
    }
}
