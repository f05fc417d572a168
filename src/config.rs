use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::{StrategyRule, default_strategies};
use crate::error::ConfigError;
use crate::types::Period;
use crate::{DEFAULT_FEED_BASE, TELEGRAM_API_BASE};

/// Default config file path.
pub const CONFIG_PATH: &str = "config.toml";

/// Top-level application config deserialized from `config.toml`.
///
/// Secrets are normally left out of the file and supplied through the
/// environment; see [`AppConfig::apply_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub windows: WindowConfig,
    #[serde(default)]
    pub pressure: PressureConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub quorum: QuorumConfig,
    #[serde(default)]
    pub lines: LinesConfig,
    #[serde(default)]
    pub venues: VenueConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            telegram: TelegramConfig::default(),
            scan: ScanConfig::default(),
            windows: WindowConfig::default(),
            pressure: PressureConfig::default(),
            gate: GateConfig::default(),
            quorum: QuorumConfig::default(),
            lines: LinesConfig::default(),
            venues: VenueConfig::default(),
            journal: JournalConfig::default(),
            web: WebConfig::default(),
            logging: LoggingConfig::default(),
            strategies: default_strategies(),
        }
    }
}

/// Statistics provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_base")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Minimum spacing between two outbound feed requests.
    #[serde(default = "default_min_request_spacing")]
    pub min_request_spacing_ms: u64,
    /// Sleep applied after a 429 response.
    #[serde(default = "default_rate_limit_backoff")]
    pub rate_limit_backoff_secs: u64,
    /// Per-match quiet period after an empty or failed statistics fetch.
    #[serde(default = "default_stats_backoff")]
    pub stats_backoff_secs: u64,
    /// Matches below this minute are not worth a statistics request.
    #[serde(default = "default_min_fetch_minute")]
    pub min_fetch_minute: f64,
}

fn default_feed_base() -> String {
    DEFAULT_FEED_BASE.to_string()
}
fn default_request_timeout() -> u64 {
    15
}
fn default_min_request_spacing() -> u64 {
    800
}
fn default_rate_limit_backoff() -> u64 {
    30
}
fn default_stats_backoff() -> u64 {
    90
}
fn default_min_fetch_minute() -> f64 {
    25.0
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_base(),
            api_key: String::new(),
            request_timeout_secs: default_request_timeout(),
            min_request_spacing_ms: default_min_request_spacing(),
            rate_limit_backoff_secs: default_rate_limit_backoff(),
            stats_backoff_secs: default_stats_backoff(),
            min_fetch_minute: default_min_fetch_minute(),
        }
    }
}

impl FeedConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn min_request_spacing(&self) -> Duration {
        Duration::from_millis(self.min_request_spacing_ms)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }

    pub fn stats_backoff(&self) -> Duration {
        Duration::from_secs(self.stats_backoff_secs)
    }
}

/// Outbound channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_base")]
    pub api_base: String,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    /// Optional private chat that receives a one-line echo of every signal.
    #[serde(default)]
    pub admin_chat_id: Option<String>,
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub announce_startup: bool,
    /// Poll `getUpdates` and answer `/status` and `/today`.
    #[serde(default = "default_true")]
    pub commands_enabled: bool,
}

fn default_telegram_base() -> String {
    TELEGRAM_API_BASE.to_string()
}
fn default_send_timeout() -> u64 {
    20
}
fn default_true() -> bool {
    true
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_base(),
            bot_token: String::new(),
            chat_id: String::new(),
            admin_chat_id: None,
            send_timeout_secs: default_send_timeout(),
            announce_startup: true,
            commands_enabled: true,
        }
    }
}

/// Poll loop pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_base_interval")]
    pub base_interval_secs: u64,
    /// Live-match count above which the interval is stretched.
    #[serde(default = "default_congestion_threshold")]
    pub congestion_threshold: usize,
    #[serde(default = "default_congestion_extra")]
    pub congestion_extra_secs: u64,
}

fn default_base_interval() -> u64 {
    120
}
fn default_congestion_threshold() -> usize {
    20
}
fn default_congestion_extra() -> u64 {
    60
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_interval_secs: default_base_interval(),
            congestion_threshold: default_congestion_threshold(),
            congestion_extra_secs: default_congestion_extra(),
        }
    }
}

impl ScanConfig {
    pub fn base_interval(&self) -> Duration {
        Duration::from_secs(self.base_interval_secs)
    }

    /// Sleep before the next cycle given how many matches are live.
    pub fn interval_for(&self, live_matches: usize) -> Duration {
        if live_matches > self.congestion_threshold {
            Duration::from_secs(self.base_interval_secs + self.congestion_extra_secs)
        } else {
            self.base_interval()
        }
    }
}

/// Closed minute interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    pub fn contains(&self, minute: f64) -> bool {
        self.start <= minute && minute <= self.end
    }
}

/// Signal windows and minute smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_first_half")]
    pub first_half: Window,
    #[serde(default = "default_second_half")]
    pub second_half: Window,
    /// Largest forward jump of the smoothed minute per observation.
    #[serde(default = "default_max_step")]
    pub max_step: f64,
    #[serde(default = "default_max_minute")]
    pub max_minute: f64,
}

fn default_first_half() -> Window {
    Window {
        start: 29.8,
        end: 42.0,
    }
}
fn default_second_half() -> Window {
    Window {
        start: 69.8,
        end: 93.0,
    }
}
fn default_max_step() -> f64 {
    5.0
}
fn default_max_minute() -> f64 {
    95.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            first_half: default_first_half(),
            second_half: default_second_half(),
            max_step: default_max_step(),
            max_minute: default_max_minute(),
        }
    }
}

/// Relative weight of each differential in the pressure score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PressureWeights {
    pub attacks: f64,
    pub danger: f64,
    pub shots: f64,
    pub possession: f64,
}

impl PressureWeights {
    pub fn total(&self) -> f64 {
        self.attacks + self.danger + self.shots + self.possession
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureConfig {
    #[serde(default = "default_activity_floor")]
    pub min_attacks_sum: u32,
    #[serde(default = "default_activity_floor")]
    pub min_danger_sum: u32,
    #[serde(default = "default_attack_span")]
    pub attack_span: f64,
    #[serde(default = "default_danger_span")]
    pub danger_span: f64,
    #[serde(default = "default_shot_span")]
    pub shot_span: f64,
    #[serde(default = "default_possession_span")]
    pub possession_span: f64,
    #[serde(default = "default_weights")]
    pub weights: PressureWeights,
}

fn default_activity_floor() -> u32 {
    6
}
fn default_attack_span() -> f64 {
    10.0
}
fn default_danger_span() -> f64 {
    8.0
}
fn default_shot_span() -> f64 {
    4.0
}
fn default_possession_span() -> f64 {
    20.0
}
fn default_weights() -> PressureWeights {
    PressureWeights {
        attacks: 0.25,
        danger: 0.45,
        shots: 0.20,
        possession: 0.10,
    }
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            min_attacks_sum: default_activity_floor(),
            min_danger_sum: default_activity_floor(),
            attack_span: default_attack_span(),
            danger_span: default_danger_span(),
            shot_span: default_shot_span(),
            possession_span: default_possession_span(),
            weights: default_weights(),
        }
    }
}

/// When the cooldown key and period mark are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Record as soon as the gate says yes; a failed delivery is not retried.
    OnDecision,
    /// Record only after the channel confirmed delivery.
    OnDelivery,
}

/// Anti-spam policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u64,
    /// At most one notification per match and period.
    #[serde(default = "default_true")]
    pub single_shot_per_period: bool,
    #[serde(default = "default_min_first_half")]
    pub min_strategies_first_half: usize,
    #[serde(default = "default_min_second_half")]
    pub min_strategies_second_half: usize,
    /// A met composite quorum qualifies regardless of strategy count.
    #[serde(default = "default_true")]
    pub quorum_qualifies: bool,
    #[serde(default = "default_record_policy")]
    pub record: RecordPolicy,
}

fn default_cooldown_minutes() -> u64 {
    10
}
fn default_min_first_half() -> usize {
    2
}
fn default_min_second_half() -> usize {
    3
}
fn default_record_policy() -> RecordPolicy {
    RecordPolicy::OnDecision
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: default_cooldown_minutes(),
            single_shot_per_period: true,
            min_strategies_first_half: default_min_first_half(),
            min_strategies_second_half: default_min_second_half(),
            quorum_qualifies: true,
            record: default_record_policy(),
        }
    }
}

impl GateConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_minutes * 60)
    }

    pub fn min_strategies(&self, period: Period) -> usize {
        match period {
            Period::FirstHalf => self.min_strategies_first_half,
            Period::SecondHalf => self.min_strategies_second_half,
        }
    }
}

/// Composite trigger: `required` of five conditions must hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuorumConfig {
    #[serde(default = "default_quorum_required")]
    pub required: usize,
    #[serde(default = "default_activity_floor")]
    pub min_attacks_sum: u32,
    #[serde(default = "default_activity_floor")]
    pub min_danger_sum: u32,
    #[serde(default = "default_min_pressure")]
    pub min_pressure: f64,
}

/// Window and scoreline alone make two; a third hit needs real activity.
fn default_quorum_required() -> usize {
    3
}
fn default_min_pressure() -> f64 {
    0.40
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            required: default_quorum_required(),
            min_attacks_sum: default_activity_floor(),
            min_danger_sum: default_activity_floor(),
            min_pressure: default_min_pressure(),
        }
    }
}

/// Poisson corner-line block of the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinesConfig {
    /// Expected corners for the rest of the window.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    #[serde(default = "default_candidate_lines")]
    pub candidates: Vec<f64>,
    #[serde(default = "default_lines_shown")]
    pub shown: usize,
}

fn default_lambda() -> f64 {
    1.5
}
fn default_candidate_lines() -> Vec<f64> {
    vec![3.5, 4.0, 4.5, 5.0, 5.5]
}
fn default_lines_shown() -> usize {
    3
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            candidates: default_candidate_lines(),
            shown: default_lines_shown(),
        }
    }
}

/// Venues known to produce more corners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    #[serde(default = "default_small_venues")]
    pub small: Vec<String>,
}

fn default_small_venues() -> Vec<String> {
    [
        "loftus road",
        "vitality stadium",
        "kenilworth road",
        "turf moor",
        "bramall lane",
        "ewood park",
        "the den",
        "carrow road",
        "bet365 stadium",
        "pride park",
        "liberty stadium",
        "fratton park",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            small: default_small_venues(),
        }
    }
}

impl VenueConfig {
    /// Case-insensitive allow-list lookup.
    pub fn is_small(&self, venue: &str) -> bool {
        let venue = venue.trim().to_lowercase();
        !venue.is_empty() && self.small.iter().any(|v| v.trim().to_lowercase() == venue)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_journal_path")]
    pub path: PathBuf,
}

fn default_journal_path() -> PathBuf {
    PathBuf::from("signals.jsonl")
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: default_journal_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    10000
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write config to the given TOML file path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Overlay secrets and a few operational knobs from the environment.
    pub fn apply_env(&mut self) -> std::result::Result<(), ConfigError> {
        self.apply_vars(|key| env::var(key).ok())
    }

    fn apply_vars<F>(&mut self, var: F) -> std::result::Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = non_empty("API_FOOTBALL_KEY") {
            self.feed.api_key = key;
        }
        if let Some(token) = non_empty("TOKEN").or_else(|| non_empty("TELEGRAM_TOKEN")) {
            self.telegram.bot_token = token;
        }
        if let Some(chat) = non_empty("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = chat;
        }
        if let Some(admin) = non_empty("TELEGRAM_ADMIN_ID") {
            self.telegram.admin_chat_id = Some(admin);
        }
        if let Some(level) = non_empty("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        if let Some(raw) = non_empty("PORT") {
            self.web.port = parse_var("PORT", &raw)?;
        }
        if let Some(raw) = non_empty("SCAN_INTERVAL") {
            self.scan.base_interval_secs = parse_var("SCAN_INTERVAL", &raw)?;
        }
        if let Some(raw) = non_empty("RENOTIFY_MINUTES") {
            self.gate.cooldown_minutes = parse_var("RENOTIFY_MINUTES", &raw)?;
        }
        Ok(())
    }

    /// Reject configurations the bot cannot run with.
    ///
    /// Channel credentials are only required when messages are actually sent.
    pub fn validate(&self, require_channel: bool) -> std::result::Result<(), ConfigError> {
        if self.feed.api_key.is_empty() {
            return Err(ConfigError::Missing("API_FOOTBALL_KEY"));
        }
        if require_channel {
            if self.telegram.bot_token.is_empty() {
                return Err(ConfigError::Missing("TOKEN"));
            }
            if self.telegram.chat_id.is_empty() {
                return Err(ConfigError::Missing("TELEGRAM_CHAT_ID"));
            }
        }

        let (ht, ft) = (self.windows.first_half, self.windows.second_half);
        if ht.start > ht.end || ft.start > ft.end {
            return Err(ConfigError::Invalid("window start after window end".into()));
        }
        if ht.end >= ft.start {
            return Err(ConfigError::Invalid(format!(
                "first-half window [{}, {}] overlaps second-half window [{}, {}]",
                ht.start, ht.end, ft.start, ft.end
            )));
        }
        if self.windows.max_step <= 0.0 {
            return Err(ConfigError::Invalid("windows.max_step must be positive".into()));
        }

        let weights = self.pressure.weights.total();
        if (weights - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid(format!(
                "pressure weights must sum to 1.0 (got {weights:.3})"
            )));
        }
        let p = &self.pressure;
        if [p.attack_span, p.danger_span, p.shot_span, p.possession_span]
            .iter()
            .any(|span| *span <= 0.0)
        {
            return Err(ConfigError::Invalid("pressure spans must be positive".into()));
        }

        if self.quorum.required == 0 || self.quorum.required > 5 {
            return Err(ConfigError::Invalid(format!(
                "quorum.required must be within 1..=5 (got {})",
                self.quorum.required
            )));
        }
        if self.lines.lambda <= 0.0 {
            return Err(ConfigError::Invalid("lines.lambda must be positive".into()));
        }
        if self.strategies.iter().any(|rule| rule.name.trim().is_empty()) {
            return Err(ConfigError::Invalid("every strategy needs a name".into()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> std::result::Result<T, ConfigError> {
    raw.parse::<T>()
        .map_err(|_| ConfigError::Invalid(format!("{key}={raw} is not a valid number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn configured() -> AppConfig {
        let mut config = AppConfig::default();
        config.feed.api_key = "key".into();
        config.telegram.bot_token = "token".into();
        config.telegram.chat_id = "-100".into();
        config
    }

    #[test]
    fn defaults_are_valid_once_credentials_exist() {
        assert!(configured().validate(true).is_ok());
    }

    #[test]
    fn missing_credentials_are_fatal() {
        let mut config = configured();
        config.feed.api_key.clear();
        assert!(matches!(
            config.validate(false),
            Err(ConfigError::Missing("API_FOOTBALL_KEY"))
        ));

        let mut config = configured();
        config.telegram.chat_id.clear();
        assert!(matches!(
            config.validate(true),
            Err(ConfigError::Missing("TELEGRAM_CHAT_ID"))
        ));
        // Dry runs never touch the channel.
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn overlapping_windows_rejected() {
        let mut config = configured();
        config.windows.first_half.end = 75.0;
        assert!(matches!(config.validate(true), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut config = configured();
        config.pressure.weights.danger = 0.9;
        assert!(matches!(config.validate(true), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn quorum_bounds() {
        let mut config = configured();
        config.quorum.required = 6;
        assert!(config.validate(true).is_err());
        config.quorum.required = 3;
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("API_FOOTBALL_KEY", "abc"),
            ("TOKEN", "123:xyz"),
            ("TELEGRAM_CHAT_ID", "-100200"),
            ("TELEGRAM_ADMIN_ID", "42"),
            ("PORT", "8080"),
            ("SCAN_INTERVAL", "300"),
            ("RENOTIFY_MINUTES", "3"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config
            .apply_vars(|k| vars.get(k).map(|v| v.to_string()))
            .expect("valid env");
        assert_eq!(config.feed.api_key, "abc");
        assert_eq!(config.telegram.bot_token, "123:xyz");
        assert_eq!(config.telegram.chat_id, "-100200");
        assert_eq!(config.telegram.admin_chat_id.as_deref(), Some("42"));
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.scan.base_interval_secs, 300);
        assert_eq!(config.gate.cooldown(), Duration::from_secs(180));
    }

    #[test]
    fn env_bad_number_is_config_error() {
        let mut config = AppConfig::default();
        let err = config
            .apply_vars(|k| (k == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scan]
            base_interval_secs = 300

            [quorum]
            required = 3
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.scan.base_interval_secs, 300);
        assert_eq!(config.scan.congestion_threshold, 20);
        assert_eq!(config.quorum.required, 3);
        assert_eq!(config.lines.candidates, vec![3.5, 4.0, 4.5, 5.0, 5.5]);
        assert!(!config.strategies.is_empty());
    }

    #[test]
    fn strategies_round_trip_through_toml() {
        let config = configured();
        let text = toml::to_string_pretty(&config).expect("serializable");
        let back: AppConfig = toml::from_str(&text).expect("parsable");
        assert_eq!(back.strategies, config.strategies);
    }

    #[test]
    fn interval_stretches_under_load() {
        let scan = ScanConfig::default();
        assert_eq!(scan.interval_for(5), Duration::from_secs(120));
        assert_eq!(scan.interval_for(20), Duration::from_secs(120));
        assert_eq!(scan.interval_for(21), Duration::from_secs(180));
    }

    #[test]
    fn small_venue_lookup_ignores_case() {
        let venues = VenueConfig::default();
        assert!(venues.is_small("Turf Moor"));
        assert!(venues.is_small("  kenilworth road "));
        assert!(!venues.is_small("Old Trafford"));
        assert!(!venues.is_small(""));
    }
}
