use tokio::time::Instant;

use crate::config::{GateConfig, RecordPolicy};
use crate::state::MatchState;
use crate::types::{Period, StrategyResult};

/// Verdict of the anti-spam gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Notify,
    /// Not enough strategies fired and the quorum did not carry it.
    Insufficient { fired: usize, required: usize },
    PeriodAlreadySignalled(Period),
    CoolingDown,
}

impl GateDecision {
    pub fn is_notify(&self) -> bool {
        matches!(self, GateDecision::Notify)
    }

    pub fn reason(&self) -> String {
        match self {
            GateDecision::Notify => "notify".to_string(),
            GateDecision::Insufficient { fired, required } => {
                format!("{fired} strategies, need {required}")
            }
            GateDecision::PeriodAlreadySignalled(p) => format!("{p} already signalled"),
            GateDecision::CoolingDown => "cooldown".to_string(),
        }
    }
}

/// Cooldown key: fired strategy names plus the corner total as fingerprint.
pub fn signal_key(result: &StrategyResult, total_corners: u32) -> String {
    let identity = if result.fired.is_empty() {
        "composite".to_string()
    } else {
        result.fired.join("+")
    };
    format!("{identity}#{total_corners}")
}

/// Per-period single-shot gate backed by a per-key cooldown.
#[derive(Debug, Clone)]
pub struct NotificationGate {
    cfg: GateConfig,
}

impl NotificationGate {
    pub fn new(cfg: GateConfig) -> Self {
        Self { cfg }
    }

    pub fn record_policy(&self) -> RecordPolicy {
        self.cfg.record
    }

    /// Whether the result is strong enough for the period at all.
    pub fn qualifies(&self, result: &StrategyResult, period: Period) -> Result<(), GateDecision> {
        if self.cfg.quorum_qualifies && result.quorum_met {
            return Ok(());
        }
        let required = self.cfg.min_strategies(period);
        if result.count() >= required {
            Ok(())
        } else {
            Err(GateDecision::Insufficient {
                fired: result.count(),
                required,
            })
        }
    }

    /// Cooldown check for a single key. Read-only.
    pub fn should_notify_key(&self, state: &MatchState, key: &str, now: Instant) -> bool {
        match state.cooldowns.get(key) {
            Some(last) => now.duration_since(*last) >= self.cfg.cooldown(),
            None => true,
        }
    }

    /// Period gate first, then cooldown. Read-only.
    pub fn check(&self, state: &MatchState, period: Period, key: &str, now: Instant) -> GateDecision {
        if self.cfg.single_shot_per_period && state.periods_signalled.contains(&period) {
            return GateDecision::PeriodAlreadySignalled(period);
        }
        if !self.should_notify_key(state, key, now) {
            return GateDecision::CoolingDown;
        }
        GateDecision::Notify
    }

    /// Mark the period and stamp the key.
    pub fn record(&self, state: &mut MatchState, period: Period, key: &str, now: Instant) {
        state.periods_signalled.insert(period);
        state.cooldowns.insert(key.to_string(), now);
    }

    /// Full decision. Records immediately under [`RecordPolicy::OnDecision`];
    /// under `OnDelivery` the caller records after a confirmed send.
    pub fn decide(
        &self,
        state: &mut MatchState,
        result: &StrategyResult,
        period: Period,
        key: &str,
        now: Instant,
    ) -> GateDecision {
        if let Err(insufficient) = self.qualifies(result, period) {
            return insufficient;
        }
        let decision = self.check(state, period, key, now);
        if decision.is_notify() && self.cfg.record == RecordPolicy::OnDecision {
            self.record(state, period, key, now);
        }
        decision
    }
}
