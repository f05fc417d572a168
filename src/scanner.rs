use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::api::{MatchFeed, RateUsage};
use crate::config::{
    AppConfig, FeedConfig, LinesConfig, PressureConfig, RecordPolicy, ScanConfig, VenueConfig,
    WindowConfig,
};
use crate::engine::{MatchContext, RuleEngine};
use crate::error::FeedError;
use crate::format;
use crate::gate::{GateDecision, NotificationGate, signal_key};
use crate::journal::DecisionLog;
use crate::lines::evaluate_candidate_lines;
use crate::state::MatchStore;
use crate::telegram::{Notifier, ParseMode, deliver};
use crate::types::{LiveFixture, MatchSnapshot, Outcome, Side, SignalRecord};
use crate::{minute, normalize, pressure};

/// Counters shared with the status endpoint and the `/status` command.
#[derive(Debug, Clone, Serialize)]
pub struct ScanStats {
    pub started_at: DateTime<Utc>,
    pub scans: u64,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub live_matches: usize,
    pub tracked_matches: usize,
    pub signals_last_cycle: usize,
    pub signals_total: u64,
    pub delivery_failures: u64,
    pub next_interval_secs: u64,
    pub usage: RateUsage,
}

impl Default for ScanStats {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            scans: 0,
            last_scan_at: None,
            live_matches: 0,
            tracked_matches: 0,
            signals_last_cycle: 0,
            signals_total: 0,
            delivery_failures: 0,
            next_interval_secs: 0,
            usage: RateUsage::default(),
        }
    }
}

pub type SharedStats = Arc<RwLock<ScanStats>>;

/// Why a match was not evaluated this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Below the minimum minute worth a statistics request.
    TooEarly,
    OutsideWindow,
    Backoff,
    NoStats,
    RateLimited,
}

/// What happened to one match in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Skipped(SkipReason),
    NoSignal,
    Suppressed(GateDecision),
    Sent,
    DeliveryFailed,
}

/// Summary of one poll cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub live_matches: usize,
    pub analysed: usize,
    pub signals_sent: usize,
    pub delivery_failures: usize,
    pub evicted: usize,
    /// Listing was refused with 429; the pause already happened.
    pub rate_limited: bool,
    pub next_interval: Duration,
}

/// The poll loop: fetch live matches, run each through the pipeline, sleep.
pub struct Scanner {
    feed: Arc<dyn MatchFeed>,
    notifier: Arc<dyn Notifier>,
    journal: Arc<dyn DecisionLog>,
    engine: RuleEngine,
    gate: NotificationGate,
    store: MatchStore,
    stats: SharedStats,
    feed_cfg: FeedConfig,
    scan: ScanConfig,
    windows: WindowConfig,
    pressure: PressureConfig,
    lines: LinesConfig,
    venues: VenueConfig,
    chat_id: String,
    admin_chat_id: Option<String>,
}

impl Scanner {
    pub fn new(
        cfg: &AppConfig,
        feed: Arc<dyn MatchFeed>,
        notifier: Arc<dyn Notifier>,
        journal: Arc<dyn DecisionLog>,
        stats: SharedStats,
    ) -> Self {
        Self {
            feed,
            notifier,
            journal,
            engine: RuleEngine::new(cfg.strategies.clone(), cfg.quorum.clone()),
            gate: NotificationGate::new(cfg.gate.clone()),
            store: MatchStore::new(),
            stats,
            feed_cfg: cfg.feed.clone(),
            scan: cfg.scan.clone(),
            windows: cfg.windows.clone(),
            pressure: cfg.pressure.clone(),
            lines: cfg.lines.clone(),
            venues: cfg.venues.clone(),
            chat_id: cfg.telegram.chat_id.clone(),
            admin_chat_id: cfg.telegram.admin_chat_id.clone(),
        }
    }

    pub fn store(&self) -> &MatchStore {
        &self.store
    }

    /// Run forever. A failed cycle is logged and retried after the base interval.
    pub async fn run(&mut self) {
        info!(
            interval_secs = self.scan.base_interval_secs,
            strategies = self.engine.rules().len(),
            "scanner started"
        );
        loop {
            let wait = match self.run_cycle().await {
                Ok(report) => report.next_interval,
                Err(e) => {
                    error!(error = %format!("{e:#}"), "scan cycle failed");
                    self.scan.base_interval()
                }
            };
            tokio::time::sleep(wait).await;
        }
    }

    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let fixtures = match self.feed.live_matches().await {
            Ok(f) => f,
            Err(FeedError::RateLimited) => {
                warn!(
                    backoff_secs = self.feed_cfg.rate_limit_backoff_secs,
                    "rate limited listing live matches"
                );
                tokio::time::sleep(self.feed_cfg.rate_limit_backoff()).await;
                return Ok(CycleReport {
                    rate_limited: true,
                    ..CycleReport::default()
                });
            }
            Err(e) => return Err(e).context("failed to list live matches"),
        };

        let mut report = CycleReport {
            live_matches: fixtures.len(),
            ..CycleReport::default()
        };

        for fixture in &fixtures {
            let id = fixture.fixture.id;
            match self.process_match(fixture).await {
                MatchOutcome::Skipped(reason) => {
                    debug!(match_id = id, ?reason, "match skipped");
                }
                MatchOutcome::NoSignal | MatchOutcome::Suppressed(_) => report.analysed += 1,
                MatchOutcome::Sent => {
                    report.analysed += 1;
                    report.signals_sent += 1;
                }
                MatchOutcome::DeliveryFailed => {
                    report.analysed += 1;
                    report.delivery_failures += 1;
                }
            }
        }

        if !fixtures.is_empty() {
            let live: HashSet<u64> = fixtures.iter().map(|f| f.fixture.id).collect();
            report.evicted = self.store.evict_missing(&live);
        }
        report.next_interval = self.scan.interval_for(fixtures.len());

        {
            let mut stats = self.stats.write();
            stats.scans += 1;
            stats.last_scan_at = Some(Utc::now());
            stats.live_matches = report.live_matches;
            stats.tracked_matches = self.store.len();
            stats.signals_last_cycle = report.signals_sent;
            stats.signals_total += report.signals_sent as u64;
            stats.delivery_failures += report.delivery_failures as u64;
            stats.next_interval_secs = report.next_interval.as_secs();
            stats.usage = self.feed.usage();
        }

        info!(
            live = report.live_matches,
            analysed = report.analysed,
            sent = report.signals_sent,
            evicted = report.evicted,
            next_secs = report.next_interval.as_secs(),
            "scan cycle complete"
        );
        Ok(report)
    }

    /// Full pipeline for one match. Never fails: every problem degrades to a
    /// skip for this cycle.
    pub async fn process_match(&mut self, fixture: &LiveFixture) -> MatchOutcome {
        let snap = MatchSnapshot::from_fixture(fixture);
        let id = snap.id;

        let (minute, in_backoff) = {
            let state = self.store.get_or_create(id);
            let minute = state.smooth_minute(snap.minute_raw, &self.windows);
            (minute, state.in_backoff(Instant::now()))
        };

        if minute < self.feed_cfg.min_fetch_minute {
            return MatchOutcome::Skipped(SkipReason::TooEarly);
        }
        let Some(period) = minute::classify(minute, &self.windows) else {
            return MatchOutcome::Skipped(SkipReason::OutsideWindow);
        };
        if in_backoff {
            return MatchOutcome::Skipped(SkipReason::Backoff);
        }

        let stats = match self.feed.match_statistics(id).await {
            Ok(stats) if !stats.is_empty() => stats,
            Ok(_) => {
                self.back_off(id);
                return MatchOutcome::Skipped(SkipReason::NoStats);
            }
            Err(FeedError::RateLimited) => {
                warn!(
                    match_id = id,
                    backoff_secs = self.feed_cfg.rate_limit_backoff_secs,
                    "rate limited, pausing"
                );
                tokio::time::sleep(self.feed_cfg.rate_limit_backoff()).await;
                return MatchOutcome::Skipped(SkipReason::RateLimited);
            }
            Err(e) => {
                warn!(match_id = id, error = %e, "statistics fetch failed");
                self.back_off(id);
                return MatchOutcome::Skipped(SkipReason::NoStats);
            }
        };

        let (home, away) = normalize::normalize(&stats, snap.home_id, snap.away_id);
        let ctx = MatchContext {
            snapshot: &snap,
            home,
            away,
            pressure: pressure::score(&home, &away, &self.pressure),
            minute,
            period: Some(period),
            small_venue: self.venues.is_small(&snap.venue),
        };

        let result = self.engine.evaluate(&ctx);
        if result.is_empty() {
            debug!(
                match_id = id,
                reasons = %self.engine.skip_reasons(&ctx).join(" | "),
                "no strategy fired"
            );
            return MatchOutcome::NoSignal;
        }

        let key = signal_key(&result, ctx.total_corners());
        let now = Instant::now();
        let decision = self
            .gate
            .decide(self.store.get_or_create(id), &result, period, &key, now);
        if !decision.is_notify() {
            debug!(match_id = id, reason = %decision.reason(), "signal suppressed");
            return MatchOutcome::Suppressed(decision);
        }

        let mut lines =
            evaluate_candidate_lines(&self.lines.candidates, ctx.total_corners(), self.lines.lambda);
        lines.truncate(self.lines.shown);
        let message = format::signal_message(&ctx, &result, &lines);

        info!(
            match_id = id,
            teams = %snap.label(),
            minute,
            %period,
            strategies = ?result.fired,
            quorum = result.quorum_hits,
            "sending signal"
        );
        if let Err(e) = deliver(self.notifier.as_ref(), &self.chat_id, &message.html, &message.plain).await
        {
            warn!(match_id = id, error = %e, "signal delivery failed");
            return MatchOutcome::DeliveryFailed;
        }

        if self.gate.record_policy() == RecordPolicy::OnDelivery {
            self.gate
                .record(self.store.get_or_create(id), period, &key, now);
        }

        let local = Local::now();
        let record = SignalRecord {
            date: local.date_naive(),
            time: local.format("%H:%M").to_string(),
            match_id: id,
            match_label: snap.label(),
            league: snap.league.clone(),
            minute,
            period,
            score: format!("{}-{}", snap.goals(Side::Home), snap.goals(Side::Away)),
            total_corners: ctx.total_corners(),
            strategies: if result.fired.is_empty() {
                vec!["Composite".to_string()]
            } else {
                result.fired.clone()
            },
            outcome: Outcome::Pending,
        };
        if let Err(e) = self.journal.append(&record) {
            warn!(match_id = id, error = %format!("{e:#}"), "failed to append journal");
        }

        if let Some(admin) = &self.admin_chat_id {
            let echo = format::admin_summary(&ctx, &result);
            if let Err(e) = self.notifier.send(admin, &echo, ParseMode::Plain).await {
                warn!(error = %e, "admin echo failed");
            }
        }

        MatchOutcome::Sent
    }

    fn back_off(&mut self, id: u64) {
        let wait = self.feed_cfg.stats_backoff();
        self.store
            .get_or_create(id)
            .schedule_backoff(Instant::now(), wait);
        debug!(match_id = id, backoff_secs = wait.as_secs(), "statistics backoff scheduled");
    }
}
