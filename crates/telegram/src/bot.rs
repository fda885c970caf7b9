use std::{sync::Arc, time::Duration};

use {
    secrecy::ExposeSecret,
    shelter_channels::InboundEvent,
    shelter_chat::Dispatcher,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand, Update, UpdateKind},
    },
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{
    config::TelegramConfig,
    convert,
    error::{Context, Result},
};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Build the bot client and check the token with `getMe`.
pub async fn connect(config: &TelegramConfig) -> Result<Bot> {
    // The HTTP timeout must outlast the long-poll timeout.
    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(config.client_timeout_secs))
        .build()
        .context("failed to build telegram http client")?;
    let bot = Bot::with_client(config.token.expose_secret(), client);

    let me = bot.get_me().await?;

    // Long polling does not work while a webhook is set.
    bot.delete_webhook().await?;

    let commands = vec![BotCommand::new("start", "Show the main menu")];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!(error = %e, "failed to register bot commands");
    }

    info!(username = ?me.username, "telegram bot connected (webhook cleared)");
    Ok(bot)
}

/// Split a batch of updates into inbound events and callback ids to answer.
fn collect_events(updates: Vec<Update>) -> (Vec<InboundEvent>, Vec<String>) {
    let mut events = Vec::with_capacity(updates.len());
    let mut callbacks = Vec::new();
    for update in updates {
        match update.kind {
            UpdateKind::Message(msg) => events.push(convert::message_event(&msg)),
            UpdateKind::CallbackQuery(query) => {
                if let Some(event) = convert::callback_event(&query) {
                    events.push(event);
                }
                callbacks.push(query.id.to_string());
            },
            other => debug!("ignoring update: {other:?}"),
        }
    }
    (events, callbacks)
}

/// Poll `getUpdates` and hand every batch to the dispatcher.
///
/// Each batch is acknowledged once processed, whatever the outcome of
/// its events. Stops when `cancel` fires or when another instance starts
/// polling with the same token.
pub fn start_polling(
    bot: Bot,
    dispatcher: Arc<Dispatcher>,
    poll_timeout_secs: u32,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("starting telegram polling loop");
        let mut offset: i32 = 0;

        loop {
            let request = bot
                .get_updates()
                .offset(offset)
                .timeout(poll_timeout_secs)
                .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery]);

            let result = tokio::select! {
                () = cancel.cancelled() => break,
                result = request.send() => result,
            };

            match result {
                Ok(updates) => {
                    let Some(last) = updates.last() else {
                        continue;
                    };
                    let next_offset = last.id.as_offset();
                    debug!(count = updates.len(), "got telegram updates");

                    let (events, callbacks) = collect_events(updates);
                    for id in callbacks {
                        if let Err(e) = bot.answer_callback_query(id).await {
                            warn!(error = %e, "failed to answer callback query");
                        }
                    }

                    let report = dispatcher.process(&events).await;
                    debug!(
                        events = report.events,
                        failed = report.failed,
                        delivered = report.delivered,
                        undelivered = report.undelivered,
                        "batch processed"
                    );
                    if report.acknowledged() {
                        offset = next_offset;
                    }
                },
                Err(RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) => {
                    warn!("telegram polling stopped: another instance is running with this token");
                    cancel.cancel();
                    break;
                },
                Err(e) => {
                    warn!(error = %e, "telegram getUpdates failed");
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(RETRY_DELAY) => {},
                    }
                },
            }
        }

        info!("telegram polling stopped");
    })
}
