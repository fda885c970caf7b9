mod bootstrap;
mod config_commands;

use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    shelter_channels::AttachmentFetcher,
    shelter_chat::{Dispatcher, Services},
    shelter_config::ShelterBotConfig,
    shelter_telegram::{TelegramConfig, TelegramOutbound},
    tokio_util::sync::CancellationToken,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "shelter-bot", about = "Telegram assistant for animal shelters")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery in ./ and the user config dir).
    #[arg(long, global = true, env = "SHELTER_BOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start polling Telegram (default when no subcommand is provided).
    Run,
    /// Validate the configuration file and print a summary.
    Check,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ShelterBotConfig> {
    Ok(match &cli.config {
        Some(path) => shelter_config::load_config(path)?,
        None => shelter_config::discover_and_load()?,
    })
}

async fn run(config: ShelterBotConfig) -> anyhow::Result<()> {
    let telegram = TelegramConfig::from_value(config.telegram.clone())?;
    let directory = Arc::new(bootstrap::directory(&config));

    let bot = shelter_telegram::connect(&telegram).await?;
    let transport = Arc::new(TelegramOutbound::new(bot.clone()));
    let dispatcher = Arc::new(Dispatcher::new(
        Services::from_directory(directory),
        Arc::clone(&transport) as Arc<dyn AttachmentFetcher>,
        transport,
    ));

    let cancel = CancellationToken::new();
    let polling = shelter_telegram::start_polling(
        bot,
        dispatcher,
        telegram.poll_timeout_secs,
        cancel.clone(),
    );

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("shutdown requested");
            cancel.cancel();
        },
        () = cancel.cancelled() => {},
    }
    polling.await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "shelter-bot starting");

    let config = load_config(&cli)?;
    match cli.command {
        None | Some(Commands::Run) => run(config).await,
        Some(Commands::Check) => config_commands::check(&config),
    }
}
