use serde::{Deserialize, Serialize};

use crate::config::QuorumConfig;
use crate::types::{MatchSnapshot, Period, Pressure, Side, Stat, StrategyResult, TeamMetrics};

/// Everything a rule may look at for one match in one cycle.
#[derive(Debug, Clone)]
pub struct MatchContext<'a> {
    pub snapshot: &'a MatchSnapshot,
    pub home: TeamMetrics,
    pub away: TeamMetrics,
    pub pressure: Pressure,
    /// Smoothed minute.
    pub minute: f64,
    pub period: Option<Period>,
    pub small_venue: bool,
}

impl MatchContext<'_> {
    pub fn metrics(&self, side: Side) -> &TeamMetrics {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn sum(&self, stat: Stat) -> u32 {
        self.home.get(stat) + self.away.get(stat)
    }

    pub fn total_corners(&self) -> u32 {
        self.sum(Stat::Corners)
    }

    fn goals(&self, side: Side) -> u32 {
        self.snapshot.goals(side)
    }
}

/// Which side(s) a condition is about.
///
/// `Focus` and `Other` only resolve inside an `each_side` rule; in a
/// match-scoped rule they never hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideRef {
    Home,
    Away,
    Focus,
    Other,
    Either,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cmp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Cmp {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Cmp::Lt => lhs < rhs,
            Cmp::Le => lhs <= rhs,
            Cmp::Gt => lhs > rhs,
            Cmp::Ge => lhs >= rhs,
        }
    }
}

/// One predicate of a strategy. A strategy fires when all of its
/// conditions hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    InPeriod { period: Period },
    /// Inclusive minute range.
    MinuteBetween { from: f64, to: f64 },
    MinuteAtLeast { minute: f64 },
    ScoreLevel,
    Losing { side: SideRef },
    NotWinning { side: SideRef },
    /// Pressure of `side` at least `min`.
    Pressure { side: SideRef, min: f64 },
    /// Pressure of `side` strictly above the opponent's plus `margin`.
    PressureLead { side: SideRef, margin: f64 },
    SmallVenue,
    Stat {
        stat: Stat,
        side: SideRef,
        op: Cmp,
        value: f64,
    },
    /// Both teams combined.
    StatSum { stat: Stat, op: Cmp, value: f64 },
    /// Absolute difference between the teams.
    StatGap { stat: Stat, op: Cmp, value: f64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// Evaluated once for the match.
    #[default]
    Match,
    /// Evaluated for home and away separately; the name gets a side suffix.
    EachSide,
}

/// A named strategy expressed as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRule {
    pub name: String,
    #[serde(default)]
    pub scope: RuleScope,
    pub when: Vec<Condition>,
}

fn resolve(side: SideRef, focus: Option<Side>, check: impl Fn(Side) -> bool) -> bool {
    match side {
        SideRef::Home => check(Side::Home),
        SideRef::Away => check(Side::Away),
        SideRef::Focus => focus.is_some_and(&check),
        SideRef::Other => focus.is_some_and(|s| check(s.other())),
        SideRef::Either => Side::BOTH.iter().any(|s| check(*s)),
        SideRef::Both => Side::BOTH.iter().all(|s| check(*s)),
    }
}

impl Condition {
    pub fn holds(&self, ctx: &MatchContext<'_>, focus: Option<Side>) -> bool {
        match self {
            Condition::InPeriod { period } => ctx.period == Some(*period),
            Condition::MinuteBetween { from, to } => *from <= ctx.minute && ctx.minute <= *to,
            Condition::MinuteAtLeast { minute } => ctx.minute >= *minute,
            Condition::ScoreLevel => ctx.goals(Side::Home) == ctx.goals(Side::Away),
            Condition::Losing { side } => {
                resolve(*side, focus, |s| ctx.goals(s) < ctx.goals(s.other()))
            }
            Condition::NotWinning { side } => {
                resolve(*side, focus, |s| ctx.goals(s) <= ctx.goals(s.other()))
            }
            Condition::Pressure { side, min } => {
                resolve(*side, focus, |s| ctx.pressure.get(s) >= *min)
            }
            Condition::PressureLead { side, margin } => resolve(*side, focus, |s| {
                ctx.pressure.get(s) > ctx.pressure.get(s.other()) + *margin
            }),
            Condition::SmallVenue => ctx.small_venue,
            Condition::Stat {
                stat,
                side,
                op,
                value,
            } => resolve(*side, focus, |s| {
                op.apply(ctx.metrics(s).get(*stat) as f64, *value)
            }),
            Condition::StatSum { stat, op, value } => op.apply(ctx.sum(*stat) as f64, *value),
            Condition::StatGap { stat, op, value } => {
                let gap = ctx.home.get(*stat).abs_diff(ctx.away.get(*stat));
                op.apply(gap as f64, *value)
            }
        }
    }
}

impl StrategyRule {
    /// Names under which this rule fired, empty if it did not.
    pub fn fired(&self, ctx: &MatchContext<'_>) -> Vec<String> {
        match self.scope {
            RuleScope::Match => {
                if self.when.iter().all(|c| c.holds(ctx, None)) {
                    vec![self.name.clone()]
                } else {
                    Vec::new()
                }
            }
            RuleScope::EachSide => Side::BOTH
                .iter()
                .filter(|side| self.when.iter().all(|c| c.holds(ctx, Some(**side))))
                .map(|side| format!("{} ({})", self.name, side.label()))
                .collect(),
        }
    }
}

/// Built-in strategy table.
pub fn default_strategies() -> Vec<StrategyRule> {
    use Condition as C;

    let rule = |name: &str, scope: RuleScope, when: Vec<Condition>| StrategyRule {
        name: name.to_string(),
        scope,
        when,
    };
    let minutes = |from: f64, to: f64| C::MinuteBetween { from, to };
    let pressure = |side: SideRef, min: f64| C::Pressure { side, min };

    vec![
        rule(
            "HT - Home level",
            RuleScope::Match,
            vec![
                C::InPeriod {
                    period: Period::FirstHalf,
                },
                C::ScoreLevel,
                pressure(SideRef::Home, 0.40),
            ],
        ),
        rule(
            "FT - Comeback",
            RuleScope::EachSide,
            vec![
                minutes(70.0, 88.0),
                C::Losing {
                    side: SideRef::Focus,
                },
                pressure(SideRef::Focus, 0.40),
            ],
        ),
        rule(
            "FT - Second-half corners",
            RuleScope::Match,
            vec![
                C::InPeriod {
                    period: Period::SecondHalf,
                },
                pressure(SideRef::Either, 0.40),
                C::StatSum {
                    stat: Stat::Corners,
                    op: Cmp::Le,
                    value: 8.0,
                },
            ],
        ),
        rule(
            "Tight venue + pressure",
            RuleScope::Match,
            vec![
                C::SmallVenue,
                pressure(SideRef::Either, 0.40),
                minutes(25.0, 90.0),
            ],
        ),
        rule(
            "Open game (both pressing)",
            RuleScope::Match,
            vec![
                C::MinuteAtLeast { minute: 30.0 },
                pressure(SideRef::Both, 0.30),
            ],
        ),
        rule(
            "Favorite in trouble",
            RuleScope::EachSide,
            vec![
                minutes(35.0, 80.0),
                C::PressureLead {
                    side: SideRef::Focus,
                    margin: 0.10,
                },
                C::Losing {
                    side: SideRef::Focus,
                },
            ],
        ),
        rule(
            "HT - Live game",
            RuleScope::Match,
            vec![
                minutes(25.0, 40.0),
                C::StatSum {
                    stat: Stat::Attacks,
                    op: Cmp::Ge,
                    value: 14.0,
                },
                C::StatSum {
                    stat: Stat::Danger,
                    op: Cmp::Ge,
                    value: 5.0,
                },
            ],
        ),
        rule(
            "FT - Live game",
            RuleScope::Match,
            vec![
                minutes(70.0, 90.0),
                C::StatSum {
                    stat: Stat::Attacks,
                    op: Cmp::Ge,
                    value: 18.0,
                },
                C::StatSum {
                    stat: Stat::Danger,
                    op: Cmp::Ge,
                    value: 7.0,
                },
            ],
        ),
        rule(
            "Dominant without reward",
            RuleScope::EachSide,
            vec![
                C::PressureLead {
                    side: SideRef::Focus,
                    margin: 0.20,
                },
                C::Stat {
                    stat: Stat::Possession,
                    side: SideRef::Focus,
                    op: Cmp::Ge,
                    value: 58.0,
                },
                C::Stat {
                    stat: Stat::Danger,
                    side: SideRef::Focus,
                    op: Cmp::Ge,
                    value: 6.0,
                },
                C::NotWinning {
                    side: SideRef::Focus,
                },
            ],
        ),
        rule(
            "Stalled match",
            RuleScope::Match,
            vec![
                C::InPeriod {
                    period: Period::SecondHalf,
                },
                C::StatSum {
                    stat: Stat::Shots,
                    op: Cmp::Le,
                    value: 8.0,
                },
                C::StatGap {
                    stat: Stat::Possession,
                    op: Cmp::Le,
                    value: 10.0,
                },
            ],
        ),
        rule(
            "End to end",
            RuleScope::Match,
            vec![
                pressure(SideRef::Both, 0.35),
                C::StatSum {
                    stat: Stat::Danger,
                    op: Cmp::Ge,
                    value: 12.0,
                },
            ],
        ),
    ]
}

/// Evaluates the strategy table and the composite quorum.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<StrategyRule>,
    quorum: QuorumConfig,
}

impl RuleEngine {
    pub fn new(rules: Vec<StrategyRule>, quorum: QuorumConfig) -> Self {
        Self { rules, quorum }
    }

    pub fn rules(&self) -> &[StrategyRule] {
        &self.rules
    }

    /// Number of composite conditions that hold.
    pub fn quorum_hits(&self, ctx: &MatchContext<'_>) -> usize {
        let q = &self.quorum;
        let coherent = match ctx.pressure.leader() {
            _ if ctx.goals(Side::Home) == ctx.goals(Side::Away) => true,
            Some(leader) => ctx.goals(leader) < ctx.goals(leader.other()),
            None => false,
        };
        [
            ctx.sum(Stat::Attacks) >= q.min_attacks_sum,
            ctx.sum(Stat::Danger) >= q.min_danger_sum,
            ctx.pressure.max() >= q.min_pressure,
            coherent,
            ctx.period.is_some(),
        ]
        .iter()
        .filter(|hit| **hit)
        .count()
    }

    /// Every strategy that fires, in table order, plus the quorum verdict.
    pub fn evaluate(&self, ctx: &MatchContext<'_>) -> StrategyResult {
        let fired = self.rules.iter().flat_map(|r| r.fired(ctx)).collect();
        let quorum_hits = self.quorum_hits(ctx);
        StrategyResult {
            fired,
            quorum_hits,
            quorum_met: quorum_hits >= self.quorum.required,
        }
    }

    /// Human-readable reasons nothing fired, for debug logging.
    pub fn skip_reasons(&self, ctx: &MatchContext<'_>) -> Vec<String> {
        let mut reasons = Vec::new();
        let (hg, ag) = (ctx.goals(Side::Home), ctx.goals(Side::Away));
        if ctx.period.is_none() {
            reasons.push("outside window".to_string());
        }
        if ctx.pressure.max() < self.quorum.min_pressure {
            reasons.push(format!(
                "low pressure (H:{:.2}/A:{:.2})",
                ctx.pressure.home, ctx.pressure.away
            ));
        }
        if ctx.period == Some(Period::FirstHalf) && hg != ag {
            reasons.push(format!("score not level at HT {hg}x{ag}"));
        }
        if ctx.period == Some(Period::SecondHalf) {
            let comeback = Side::BOTH.iter().any(|s| {
                ctx.goals(*s) < ctx.goals(s.other()) && ctx.pressure.get(*s) >= self.quorum.min_pressure
            });
            if !comeback {
                reasons.push("no clear FT scenario".to_string());
            }
        }
        if ctx.sum(Stat::Attacks) < self.quorum.min_attacks_sum
            || ctx.sum(Stat::Danger) < self.quorum.min_danger_sum
        {
            reasons.push(format!(
                "insufficient rhythm (sum atk={}, sum dang={})",
                ctx.sum(Stat::Attacks),
                ctx.sum(Stat::Danger)
            ));
        }
        if reasons.is_empty() {
            reasons.push("no criteria met".to_string());
        }
        reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(goals_home: u32, goals_away: u32, venue: &str) -> MatchSnapshot {
        MatchSnapshot {
            id: 1,
            minute_raw: Some(35.0),
            status: "1H".into(),
            home_id: Some(10),
            away_id: Some(20),
            home_name: "Home FC".into(),
            away_name: "Away FC".into(),
            league: "League".into(),
            venue: venue.into(),
            goals_home,
            goals_away,
        }
    }

    fn metrics(attacks: u32, danger: u32, shots: u32, possession: u32, corners: u32) -> TeamMetrics {
        TeamMetrics {
            corners,
            attacks,
            danger,
            shots,
            possession,
        }
    }

    fn ctx<'a>(
        snap: &'a MatchSnapshot,
        minute: f64,
        period: Option<Period>,
        pressure: (f64, f64),
    ) -> MatchContext<'a> {
        MatchContext {
            snapshot: snap,
            home: metrics(9, 6, 4, 50, 2),
            away: metrics(3, 1, 0, 50, 1),
            pressure: Pressure {
                home: pressure.0,
                away: pressure.1,
            },
            minute,
            period,
            small_venue: false,
        }
    }

    fn engine() -> RuleEngine {
        RuleEngine::new(default_strategies(), QuorumConfig::default())
    }

    #[test]
    fn ht_home_level_fires() {
        let snap = snapshot(0, 0, "Anfield");
        let c = ctx(&snap, 35.0, Some(Period::FirstHalf), (0.63, 0.0));
        let result = engine().evaluate(&c);
        assert!(result.fired.contains(&"HT - Home level".to_string()));
        assert!(result.quorum_met);
    }

    #[test]
    fn ht_home_level_needs_level_score() {
        let snap = snapshot(1, 0, "Anfield");
        let c = ctx(&snap, 35.0, Some(Period::FirstHalf), (0.63, 0.0));
        let result = engine().evaluate(&c);
        assert!(!result.fired.iter().any(|n| n == "HT - Home level"));
    }

    #[test]
    fn comeback_is_per_side() {
        let snap = snapshot(2, 1, "Anfield");
        let c = ctx(&snap, 75.0, Some(Period::SecondHalf), (0.1, 0.55));
        let result = engine().evaluate(&c);
        assert!(result.fired.contains(&"FT - Comeback (Away)".to_string()));
        assert!(!result.fired.contains(&"FT - Comeback (Home)".to_string()));
        assert!(result.fired.contains(&"Favorite in trouble (Away)".to_string()));
    }

    #[test]
    fn multiple_strategies_fire_in_table_order() {
        let snap = snapshot(0, 0, "Turf Moor");
        let mut c = ctx(&snap, 36.0, Some(Period::FirstHalf), (0.63, 0.0));
        c.small_venue = true;
        c.home = metrics(12, 6, 4, 60, 2);
        let result = engine().evaluate(&c);
        assert_eq!(
            result.fired,
            vec![
                "HT - Home level".to_string(),
                "Tight venue + pressure".to_string(),
                "HT - Live game".to_string(),
                "Dominant without reward (Home)".to_string(),
            ]
        );
    }

    #[test]
    fn quorum_counts_conditions() {
        let snap = snapshot(0, 1, "");
        // attacks 12, danger 7, max pressure 0.5, home leads pressure and is behind, in window.
        let c = ctx(&snap, 35.0, Some(Period::FirstHalf), (0.5, 0.0));
        assert_eq!(engine().quorum_hits(&c), 5);

        // Leader is ahead on the scoreboard and outside window.
        let snap = snapshot(1, 0, "");
        let c = ctx(&snap, 15.0, None, (0.5, 0.0));
        assert_eq!(engine().quorum_hits(&c), 3);
    }

    #[test]
    fn quorum_threshold_is_configurable() {
        let snap = snapshot(1, 0, "");
        let c = ctx(&snap, 15.0, None, (0.5, 0.0));
        let strict = RuleEngine::new(
            Vec::new(),
            QuorumConfig {
                required: 4,
                ..QuorumConfig::default()
            },
        );
        let result = strict.evaluate(&c);
        assert_eq!(result.quorum_hits, 3);
        assert!(!result.quorum_met);
        assert!(result.is_empty());
    }

    #[test]
    fn quiet_match_fires_nothing() {
        let snap = snapshot(0, 0, "");
        let mut c = ctx(&snap, 15.0, None, (0.0, 0.0));
        c.home = metrics(1, 0, 0, 50, 0);
        c.away = metrics(1, 0, 0, 50, 0);
        let result = engine().evaluate(&c);
        assert!(result.fired.is_empty());
        assert!(!result.quorum_met);
    }

    #[test]
    fn level_score_in_window_is_not_a_quorum() {
        let snap = snapshot(1, 1, "");
        let mut c = ctx(&snap, 35.0, Some(Period::FirstHalf), (0.0, 0.0));
        c.home = metrics(0, 0, 0, 50, 0);
        c.away = metrics(0, 0, 0, 50, 0);
        let result = engine().evaluate(&c);
        assert_eq!(result.quorum_hits, 2);
        assert!(!result.quorum_met);
        assert!(result.is_empty());
    }

    #[test]
    fn focus_in_match_scope_never_holds() {
        let snap = snapshot(0, 2, "");
        let c = ctx(&snap, 50.0, None, (0.9, 0.0));
        let cond = Condition::Losing {
            side: SideRef::Focus,
        };
        assert!(!cond.holds(&c, None));
        assert!(cond.holds(&c, Some(Side::Home)));
    }

    #[test]
    fn stat_gap_and_sum() {
        let snap = snapshot(0, 0, "");
        let c = ctx(&snap, 50.0, None, (0.0, 0.0));
        let gap = Condition::StatGap {
            stat: Stat::Attacks,
            op: Cmp::Ge,
            value: 6.0,
        };
        let sum = Condition::StatSum {
            stat: Stat::Corners,
            op: Cmp::Lt,
            value: 3.0,
        };
        assert!(gap.holds(&c, None));
        assert!(!sum.holds(&c, None));
    }

    #[test]
    fn skip_reasons_name_the_gap() {
        let snap = snapshot(1, 0, "");
        let c = ctx(&snap, 35.0, Some(Period::FirstHalf), (0.1, 0.0));
        let reasons = engine().skip_reasons(&c);
        assert!(reasons.iter().any(|r| r.starts_with("low pressure")));
        assert!(reasons.iter().any(|r| r.starts_with("score not level")));
    }

    #[test]
    fn rules_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Table {
            strategies: Vec<StrategyRule>,
        }
        let table: Table = toml::from_str(
            r#"
            [[strategies]]
            name = "Late siege"
            scope = "each_side"
            when = [
                { kind = "minute_at_least", minute = 80.0 },
                { kind = "pressure", side = "focus", min = 0.6 },
                { kind = "stat", stat = "corners", side = "focus", op = "lt", value = 4.0 },
            ]
            "#,
        )
        .expect("valid rule table");
        let rule = &table.strategies[0];
        assert_eq!(rule.scope, RuleScope::EachSide);

        let snap = snapshot(0, 0, "");
        let c = ctx(&snap, 85.0, Some(Period::SecondHalf), (0.7, 0.0));
        assert_eq!(rule.fired(&c), vec!["Late siege (Home)".to_string()]);
    }
}
