use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use corner_signals::api::FootballApi;
use corner_signals::config::{AppConfig, CONFIG_PATH};
use corner_signals::format;
use corner_signals::journal::Journal;
use corner_signals::reporter::StdoutNotifier;
use corner_signals::scanner::{Scanner, SharedStats};
use corner_signals::telegram::{CommandListener, Notifier, ParseMode, TelegramClient};
use corner_signals::web;

#[derive(Parser)]
#[command(name = "corner-bot", about = "Live corner-signal bot for soccer matches")]
struct Args {
    /// Path to the TOML config file (missing file means defaults)
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Write the default config to --config and exit
    #[arg(long)]
    init_config: bool,

    /// Print messages to stdout instead of sending them to Telegram
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.init_config {
        AppConfig::default().save(&args.config)?;
        println!("Wrote default config to {}", args.config.display());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&args.config)?;
    config.apply_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    config.validate(!args.dry_run)?;
    info!(
        "Loaded config from {} ({} strategies, quorum {}/5)",
        args.config.display(),
        config.strategies.len(),
        config.quorum.required
    );

    let stats = SharedStats::default();
    let journal = Arc::new(Journal::new(config.journal.path.clone()));
    let feed = Arc::new(FootballApi::new(&config.feed)?);

    let telegram = if args.dry_run {
        None
    } else {
        Some(Arc::new(TelegramClient::new(&config.telegram)?))
    };
    let notifier: Arc<dyn Notifier> = match &telegram {
        Some(client) => client.clone(),
        None => Arc::new(StdoutNotifier),
    };

    let mode = if args.dry_run { "dry-run" } else { "live" };
    info!("Starting corner bot ({mode})");

    if config.telegram.announce_startup {
        if let Err(e) = notifier
            .send(&config.telegram.chat_id, &format::startup_text(), ParseMode::Plain)
            .await
        {
            warn!("Failed to send startup message: {e}");
        }
    }

    if config.web.enabled {
        let port = config.web.port;
        let stats = stats.clone();
        tokio::spawn(async move {
            if let Err(e) = web::serve(port, stats).await {
                error!("Web server stopped: {e:#}");
            }
        });
    }

    if let Some(client) = telegram.filter(|_| config.telegram.commands_enabled) {
        let listener = CommandListener::new(client, stats.clone(), journal.clone());
        tokio::spawn(listener.run());
    }

    let mut scanner = Scanner::new(&config, feed, notifier, journal, stats);
    tokio::select! {
        _ = scanner.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
