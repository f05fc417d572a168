use serde_json::Value;

use crate::types::{Stat, TeamMetrics, TeamStatistics};

/// Keyword rule for one canonical metric.
///
/// A label belongs to the metric when it contains any `keywords` entry and
/// none of the `excludes`. Excludes keep the generic words ("attack", "shot")
/// from swallowing the specific labels ("dangerous attacks", "shots on goal").
pub struct Alias {
    pub stat: Stat,
    pub keywords: &'static [&'static str],
    pub excludes: &'static [&'static str],
}

/// Canonical alias table, tried in order; the first matching row wins.
pub const ALIASES: &[Alias] = &[
    Alias {
        stat: Stat::Corners,
        keywords: &["corner"],
        excludes: &[],
    },
    Alias {
        stat: Stat::Attacks,
        keywords: &["attack"],
        excludes: &["danger"],
    },
    Alias {
        stat: Stat::Danger,
        keywords: &["dangerous attack", "danger", "on goal"],
        excludes: &[],
    },
    Alias {
        stat: Stat::Shots,
        keywords: &["shot"],
        excludes: &[
            "on goal",
            "off goal",
            "off target",
            "blocked",
            "insidebox",
            "outsidebox",
        ],
    },
    Alias {
        stat: Stat::Possession,
        keywords: &["possession"],
        excludes: &[],
    },
];

impl Alias {
    pub fn matches(&self, label: &str) -> bool {
        self.keywords.iter().any(|k| label.contains(k))
            && !self.excludes.iter().any(|x| label.contains(x))
    }
}

/// Canonical metric for a provider label, if any.
pub fn classify_label(label: &str) -> Option<Stat> {
    let label = label.trim().to_lowercase();
    ALIASES.iter().find(|a| a.matches(&label)).map(|a| a.stat)
}

/// Integer reading of a statistic value.
///
/// Accepts numbers and numeric strings with an optional trailing `%`.
/// Null, garbage and negatives read as 0.
pub fn coerce_value(value: &Value) -> u32 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

fn assign(metrics: &mut TeamMetrics, stat: Stat, value: u32) {
    match stat {
        Stat::Corners => metrics.corners = value,
        Stat::Attacks => metrics.attacks = value,
        Stat::Danger => metrics.danger = value,
        Stat::Shots => metrics.shots = value,
        Stat::Possession => metrics.possession = value,
    }
}

/// Map the provider's per-team statistics into `(home, away)` metrics.
///
/// Blocks whose team id matches neither side are dropped. Repeated labels of
/// the same category overwrite in source order.
pub fn normalize(
    stats: &[TeamStatistics],
    home_id: Option<u64>,
    away_id: Option<u64>,
) -> (TeamMetrics, TeamMetrics) {
    let mut home = TeamMetrics::default();
    let mut away = TeamMetrics::default();

    for block in stats {
        let team_id = block.team.as_ref().and_then(|t| t.id);
        let target = match team_id {
            Some(id) if Some(id) == home_id => &mut home,
            Some(id) if Some(id) == away_id => &mut away,
            _ => continue,
        };
        for entry in &block.statistics {
            let Some(stat) = entry.kind.as_deref().and_then(classify_label) else {
                continue;
            };
            assign(target, stat, coerce_value(&entry.value));
        }
    }

    (home, away)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(team_id: u64, entries: Value) -> TeamStatistics {
        serde_json::from_value(json!({ "team": { "id": team_id }, "statistics": entries }))
            .expect("valid fixture")
    }

    #[test]
    fn alias_sets_are_mutually_exclusive() {
        let labels = [
            "Corner Kicks",
            "corners",
            "Attacks",
            "Dangerous Attacks",
            "Shots on Goal",
            "Shots on target",
            "Total Shots",
            "Shots off Goal",
            "Blocked Shots",
            "Shots insidebox",
            "Ball Possession",
            "Fouls",
            "Yellow Cards",
        ];
        for label in labels {
            let lower = label.to_lowercase();
            let hits = ALIASES.iter().filter(|a| a.matches(&lower)).count();
            assert!(hits <= 1, "{label} matched {hits} categories");
        }
    }

    #[test]
    fn classify_specific_before_generic() {
        assert_eq!(classify_label("Dangerous Attacks"), Some(Stat::Danger));
        assert_eq!(classify_label("Attacks"), Some(Stat::Attacks));
        assert_eq!(classify_label("Shots on Goal"), Some(Stat::Danger));
        assert_eq!(classify_label("Total Shots"), Some(Stat::Shots));
        assert_eq!(classify_label("Shots on target"), Some(Stat::Shots));
        assert_eq!(classify_label("Shots off Goal"), None);
        assert_eq!(classify_label("Blocked Shots"), None);
        assert_eq!(classify_label("Corner Kicks"), Some(Stat::Corners));
        assert_eq!(classify_label("Ball Possession"), Some(Stat::Possession));
        assert_eq!(classify_label("Fouls"), None);
    }

    #[test]
    fn coerce_handles_feed_shapes() {
        assert_eq!(coerce_value(&json!(7)), 7);
        assert_eq!(coerce_value(&json!("55%")), 55);
        assert_eq!(coerce_value(&json!(" 12 ")), 12);
        assert_eq!(coerce_value(&json!(3.9)), 3);
        assert_eq!(coerce_value(&json!(null)), 0);
        assert_eq!(coerce_value(&json!("n/a")), 0);
        assert_eq!(coerce_value(&json!(-4)), 0);
    }

    #[test]
    fn normalize_assigns_by_team_id() {
        let stats = vec![
            block(
                10,
                json!([
                    { "type": "Corner Kicks", "value": 5 },
                    { "type": "Attacks", "value": 40 },
                    { "type": "Dangerous Attacks", "value": 22 },
                    { "type": "Total Shots", "value": 9 },
                    { "type": "Ball Possession", "value": "61%" }
                ]),
            ),
            block(
                20,
                json!([
                    { "type": "Corner Kicks", "value": 2 },
                    { "type": "Ball Possession", "value": "39%" }
                ]),
            ),
        ];
        let (home, away) = normalize(&stats, Some(10), Some(20));
        assert_eq!(
            home,
            TeamMetrics {
                corners: 5,
                attacks: 40,
                danger: 22,
                shots: 9,
                possession: 61
            }
        );
        assert_eq!(away.corners, 2);
        assert_eq!(away.attacks, 0);
        assert_eq!(away.possession, 39);
    }

    #[test]
    fn unknown_team_is_ignored() {
        let stats = vec![block(99, json!([{ "type": "Corner Kicks", "value": 8 }]))];
        let (home, away) = normalize(&stats, Some(10), Some(20));
        assert_eq!(home, TeamMetrics::default());
        assert_eq!(away, TeamMetrics::default());
    }

    #[test]
    fn missing_possession_stays_neutral() {
        let stats = vec![block(10, json!([{ "type": "Attacks", "value": 12 }]))];
        let (home, _) = normalize(&stats, Some(10), Some(20));
        assert_eq!(home.possession, 50);
    }

    #[test]
    fn explicit_zero_possession_is_kept() {
        let stats = vec![block(10, json!([{ "type": "Ball Possession", "value": "0%" }]))];
        let (home, _) = normalize(&stats, Some(10), Some(20));
        assert_eq!(home.possession, 0);
    }

    #[test]
    fn repeated_category_last_wins() {
        let stats = vec![block(
            10,
            json!([
                { "type": "Shots on Goal", "value": 3 },
                { "type": "Dangerous Attacks", "value": 14 }
            ]),
        )];
        let (home, _) = normalize(&stats, Some(10), Some(20));
        assert_eq!(home.danger, 14);
    }

    #[test]
    fn null_type_entries_skipped() {
        let stats = vec![block(
            10,
            json!([{ "type": null, "value": 4 }, { "type": "Corner Kicks", "value": null }]),
        )];
        let (home, _) = normalize(&stats, Some(10), Some(20));
        assert_eq!(home.corners, 0);
    }
}
