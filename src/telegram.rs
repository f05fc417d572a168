//! Telegram delivery and the optional command listener.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::TelegramConfig;
use crate::error::NotifyError;
use crate::format;
use crate::journal::Journal;
use crate::scanner::SharedStats;

/// Rendering mode requested from the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
    Plain,
}

/// Outbound message channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str, mode: ParseMode) -> Result<(), NotifyError>;
}

/// Send `html`, and if the channel refuses it, retry once with `plain`.
pub async fn deliver(
    notifier: &dyn Notifier,
    chat_id: &str,
    html: &str,
    plain: &str,
) -> Result<(), NotifyError> {
    match notifier.send(chat_id, html, ParseMode::Html).await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(error = %e, "formatted send failed, retrying as plain text");
            notifier.send(chat_id, plain, ParseMode::Plain).await
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

/// Bot API client.
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(cfg: &TelegramConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.send_timeout_secs))
            .build()
            .context("failed to build telegram HTTP client")?;
        Ok(Self {
            http,
            base: format!("{}/bot{}", cfg.api_base.trim_end_matches('/'), cfg.bot_token),
        })
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, NotifyError> {
        let resp = self
            .http
            .get(format!("{}/getUpdates", self.base))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", "0".to_string()),
                ("allowed_updates", "[\"message\"]".to_string()),
            ])
            .send()
            .await?;
        let reply: ApiReply<Vec<Update>> = resp.json().await?;
        if !reply.ok {
            return Err(NotifyError::Rejected(
                reply.description.unwrap_or_else(|| "getUpdates failed".into()),
            ));
        }
        Ok(reply.result.unwrap_or_default())
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, chat_id: &str, text: &str, mode: ParseMode) -> Result<(), NotifyError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        if mode == ParseMode::Html {
            body["parse_mode"] = json!("HTML");
        }
        let resp = self
            .http
            .post(format!("{}/sendMessage", self.base))
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<IncomingMessage>,
}

/// Offset that acknowledges every update in `updates`.
fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .fold(current, i64::max)
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    #[serde(default)]
    text: Option<String>,
    chat: Chat,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// Commands understood by the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Today,
}

impl Command {
    /// Parse `/status`, `/status@SomeBot` and friends.
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.split_whitespace().next()?.to_lowercase();
        let word = word.split('@').next()?;
        match word {
            "/start" | "/help" => Some(Command::Help),
            "/status" => Some(Command::Status),
            "/today" => Some(Command::Today),
            _ => None,
        }
    }
}

/// Answers `/status` and `/today` by polling `getUpdates`.
pub struct CommandListener {
    client: Arc<TelegramClient>,
    stats: SharedStats,
    journal: Arc<Journal>,
    poll_every: Duration,
    offset: i64,
}

impl CommandListener {
    pub fn new(client: Arc<TelegramClient>, stats: SharedStats, journal: Arc<Journal>) -> Self {
        Self {
            client,
            stats,
            journal,
            poll_every: Duration::from_secs(3),
            offset: 0,
        }
    }

    fn reply_for(&self, command: Command) -> String {
        match command {
            Command::Help => format::help_text(),
            Command::Status => format::status_text(&self.stats.read()),
            Command::Today => {
                let today = chrono::Local::now().date_naive();
                match self.journal.daily_summary(today) {
                    Ok(summary) => format::daily_summary_text(&summary),
                    Err(e) => {
                        warn!(error = %e, "failed to read performance journal");
                        "No performance data available.".to_string()
                    }
                }
            }
        }
    }

    /// Skip whatever queued up while the bot was down. Offset -1 returns
    /// only the newest update and confirms everything before it.
    async fn skip_backlog(&mut self) {
        match self.client.get_updates(-1).await {
            Ok(updates) => {
                self.offset = next_offset(self.offset, &updates);
                debug!(offset = self.offset, "command backlog skipped");
            }
            Err(e) => debug!(error = %e, "failed to skip command backlog"),
        }
    }

    pub async fn run(mut self) {
        self.skip_backlog().await;
        info!("command listener started");
        let mut interval = tokio::time::interval(self.poll_every);
        loop {
            interval.tick().await;
            let updates = match self.client.get_updates(self.offset).await {
                Ok(u) => u,
                Err(e) => {
                    debug!(error = %e, "failed to poll telegram updates");
                    continue;
                }
            };
            self.offset = next_offset(self.offset, &updates);
            for update in updates {
                let Some(message) = update.message else {
                    continue;
                };
                let Some(command) = message.text.as_deref().and_then(Command::parse) else {
                    continue;
                };
                let chat_id = message.chat.id.to_string();
                let reply = self.reply_for(command);
                if let Err(e) = self.client.send(&chat_id, &reply, ParseMode::Plain).await {
                    warn!(error = %e, chat_id, "failed to answer command");
                }
            }
        }
    }
}
