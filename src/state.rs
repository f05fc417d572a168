use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::time::Instant;

use crate::config::WindowConfig;
use crate::minute;
use crate::types::Period;

/// Per-match memory kept across poll cycles.
#[derive(Debug, Clone, Default)]
pub struct MatchState {
    /// Periods in which a notification already went out.
    pub periods_signalled: HashSet<Period>,
    /// Last notification time per signal key.
    pub cooldowns: HashMap<String, Instant>,
    /// Last smoothed minute.
    pub last_minute: Option<f64>,
    /// No statistics fetch before this instant.
    pub backoff_until: Option<Instant>,
}

impl MatchState {
    /// Advance the smoothed minute with a new raw reading and return it.
    pub fn smooth_minute(&mut self, raw: Option<f64>, cfg: &WindowConfig) -> f64 {
        let next = minute::smooth(self.last_minute, raw, cfg);
        self.last_minute = Some(next);
        next
    }

    pub fn in_backoff(&self, now: Instant) -> bool {
        self.backoff_until.is_some_and(|until| now < until)
    }

    pub fn schedule_backoff(&mut self, now: Instant, wait: Duration) {
        self.backoff_until = Some(now + wait);
    }
}

/// All per-match state, keyed by fixture id.
#[derive(Debug, Default)]
pub struct MatchStore {
    matches: HashMap<u64, MatchState>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, id: u64) -> &mut MatchState {
        self.matches.entry(id).or_default()
    }

    pub fn get(&self, id: u64) -> Option<&MatchState> {
        self.matches.get(&id)
    }

    /// Drop state for every match not in `live`. Returns how many were dropped.
    pub fn evict_missing(&mut self, live: &HashSet<u64>) -> usize {
        let before = self.matches.len();
        self.matches.retain(|id, _| live.contains(id));
        before - self.matches.len()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
