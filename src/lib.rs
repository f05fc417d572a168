pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod gate;
pub mod journal;
pub mod lines;
pub mod minute;
pub mod normalize;
pub mod pressure;
pub mod reporter;
pub mod scanner;
pub mod state;
pub mod telegram;
pub mod types;
pub mod web;

/// API-Football v3 base URL (auth via `x-apisports-key`)
pub const DEFAULT_FEED_BASE: &str = "https://v3.football.api-sports.io";

/// Telegram Bot API base URL
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
