use async_trait::async_trait;
use serde::Serialize;

use crate::error::NotifyError;
use crate::telegram::{Notifier, ParseMode};

#[derive(Serialize)]
struct DryRunLine<'a> {
    chat_id: &'a str,
    mode: &'static str,
    text: &'a str,
}

/// Notifier for `--dry-run`: emits each message as a single JSON line to stdout.
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, chat_id: &str, text: &str, mode: ParseMode) -> Result<(), NotifyError> {
        println!("{}", render_line(chat_id, text, mode)?);
        Ok(())
    }
}

fn render_line(chat_id: &str, text: &str, mode: ParseMode) -> Result<String, NotifyError> {
    let line = DryRunLine {
        chat_id,
        mode: match mode {
            ParseMode::Html => "html",
            ParseMode::Plain => "plain",
        },
        text,
    };
    serde_json::to_string(&line).map_err(|e| NotifyError::Rejected(e.to_string()))
}
