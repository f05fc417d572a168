use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Feed payloads ──────────────────────────────────────────────────

/// One entry of the live fixtures list, as returned by `/fixtures?live=all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveFixture {
    pub fixture: FixtureInfo,
    #[serde(default)]
    pub league: LeagueInfo,
    pub teams: FixtureTeams,
    #[serde(default)]
    pub goals: Goals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureInfo {
    pub id: u64,
    #[serde(default)]
    pub status: FixtureStatus,
    #[serde(default)]
    pub venue: VenueInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureStatus {
    /// Elapsed minute as reported upstream. Null before kick-off and during
    /// some feed hiccups.
    #[serde(default)]
    pub elapsed: Option<f64>,
    /// Short status code ("1H", "HT", "2H", ...).
    #[serde(default)]
    pub short: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureTeams {
    pub home: TeamRef,
    pub away: TeamRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Goals {
    #[serde(default)]
    pub home: Option<u32>,
    #[serde(default)]
    pub away: Option<u32>,
}

/// Per-team block of `/fixtures/statistics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStatistics {
    #[serde(default)]
    pub team: Option<TeamRef>,
    #[serde(default)]
    pub statistics: Vec<StatEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Integer, string such as `"55%"`, or null.
    #[serde(default)]
    pub value: serde_json::Value,
}

// ── Snapshot & derived metrics ─────────────────────────────────────

/// Flattened view of one live match for a single poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub id: u64,
    pub minute_raw: Option<f64>,
    pub status: String,
    pub home_id: Option<u64>,
    pub away_id: Option<u64>,
    pub home_name: String,
    pub away_name: String,
    pub league: String,
    pub venue: String,
    pub goals_home: u32,
    pub goals_away: u32,
}

impl MatchSnapshot {
    pub fn from_fixture(fixture: &LiveFixture) -> Self {
        let name = |team: &TeamRef| team.name.clone().unwrap_or_else(|| "?".to_string());
        Self {
            id: fixture.fixture.id,
            minute_raw: fixture.fixture.status.elapsed,
            status: fixture.fixture.status.short.clone().unwrap_or_default(),
            home_id: fixture.teams.home.id,
            away_id: fixture.teams.away.id,
            home_name: name(&fixture.teams.home),
            away_name: name(&fixture.teams.away),
            league: fixture.league.name.clone().unwrap_or_default(),
            venue: fixture.fixture.venue.name.clone().unwrap_or_default(),
            goals_home: fixture.goals.home.unwrap_or(0),
            goals_away: fixture.goals.away.unwrap_or(0),
        }
    }

    pub fn goals(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.goals_home,
            Side::Away => self.goals_away,
        }
    }

    /// `"Home x Away"`, used in logs and the performance journal.
    pub fn label(&self) -> String {
        format!("{} x {}", self.home_name, self.away_name)
    }
}

/// Canonical per-team counters extracted from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamMetrics {
    pub corners: u32,
    pub attacks: u32,
    pub danger: u32,
    pub shots: u32,
    /// Ball possession percentage; 50 when the feed has no possession label.
    pub possession: u32,
}

impl Default for TeamMetrics {
    fn default() -> Self {
        Self {
            corners: 0,
            attacks: 0,
            danger: 0,
            shots: 0,
            possession: 50,
        }
    }
}

impl TeamMetrics {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Corners => self.corners,
            Stat::Attacks => self.attacks,
            Stat::Danger => self.danger,
            Stat::Shots => self.shots,
            Stat::Possession => self.possession,
        }
    }
}

/// Canonical metric categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Corners,
    Attacks,
    Danger,
    Shots,
    Possession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Home => "Home",
            Side::Away => "Away",
        }
    }
}

/// Per-side pressure scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pressure {
    pub home: f64,
    pub away: f64,
}

impl Pressure {
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn max(&self) -> f64 {
        self.home.max(self.away)
    }

    /// Side with strictly higher pressure, `None` on a tie.
    pub fn leader(&self) -> Option<Side> {
        if self.home > self.away {
            Some(Side::Home)
        } else if self.away > self.home {
            Some(Side::Away)
        } else {
            None
        }
    }
}

/// Minute windows in which signals may be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    FirstHalf,
    SecondHalf,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::FirstHalf => "HT",
            Period::SecondHalf => "FT",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the rule engine for one match snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyResult {
    /// Names of every strategy that fired, in rule-table order.
    pub fired: Vec<String>,
    /// How many of the five composite conditions held.
    pub quorum_hits: usize,
    pub quorum_met: bool,
}

impl StrategyResult {
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty() && !self.quorum_met
    }

    pub fn count(&self) -> usize {
        self.fired.len()
    }
}

// ── Performance journal ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pending,
    Green,
    Red,
    Void,
}

/// One row of the append-only performance log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub time: String,
    pub match_id: u64,
    pub match_label: String,
    pub league: String,
    pub minute: f64,
    pub period: Period,
    pub score: String,
    pub total_corners: u32,
    pub strategies: Vec<String>,
    pub outcome: Outcome,
}
