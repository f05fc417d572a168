use crate::config::PressureConfig;
use crate::types::{Pressure, TeamMetrics};

fn clamp01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// One-sided lead of `ours` over `theirs`, scaled by `span` into `[0, 1]`.
fn lead(ours: u32, theirs: u32, span: f64) -> f64 {
    clamp01((ours as f64 - theirs as f64) / span)
}

fn side_score(ours: &TeamMetrics, theirs: &TeamMetrics, cfg: &PressureConfig) -> f64 {
    let w = &cfg.weights;
    let score = w.attacks * lead(ours.attacks, theirs.attacks, cfg.attack_span)
        + w.danger * lead(ours.danger, theirs.danger, cfg.danger_span)
        + w.shots * lead(ours.shots, theirs.shots, cfg.shot_span)
        + w.possession * lead(ours.possession, theirs.possession, cfg.possession_span);
    clamp01(score)
}

/// Per-side pressure from the normalized metrics.
///
/// Both scores are 0 while the match is below the activity floors.
pub fn score(home: &TeamMetrics, away: &TeamMetrics, cfg: &PressureConfig) -> Pressure {
    let attacks = home.attacks + away.attacks;
    let danger = home.danger + away.danger;
    if attacks < cfg.min_attacks_sum || danger < cfg.min_danger_sum {
        return Pressure::default();
    }
    Pressure {
        home: side_score(home, away, cfg),
        away: side_score(away, home, cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn metrics(attacks: u32, danger: u32, shots: u32, possession: u32) -> TeamMetrics {
        TeamMetrics {
            corners: 0,
            attacks,
            danger,
            shots,
            possession,
        }
    }

    #[test]
    fn below_floor_is_zero() {
        let cfg = PressureConfig::default();
        let p = score(&metrics(3, 10, 5, 70), &metrics(2, 0, 0, 30), &cfg);
        assert_eq!(p, Pressure::default());

        let p = score(&metrics(30, 3, 5, 70), &metrics(2, 2, 0, 30), &cfg);
        assert_eq!(p.home, 0.0);
        assert_eq!(p.away, 0.0);
    }

    #[test]
    fn scenario_a_home_dominates() {
        let cfg = PressureConfig::default();
        let p = score(&metrics(9, 6, 0, 50), &metrics(3, 1, 0, 50), &cfg);
        // 0.25 * 0.6 + 0.45 * 0.625
        assert!(approx_eq(p.home, 0.43125));
        assert_eq!(p.away, 0.0);
    }

    #[test]
    fn saturates_at_one() {
        let cfg = PressureConfig::default();
        let p = score(&metrics(40, 20, 10, 80), &metrics(5, 2, 1, 20), &cfg);
        assert!(approx_eq(p.home, 1.0));
        assert_eq!(p.away, 0.0);
    }

    #[test]
    fn one_sided_differentials() {
        let cfg = PressureConfig::default();
        // Home leads attacks, away leads danger.
        let p = score(&metrics(20, 3, 2, 50), &metrics(10, 7, 2, 50), &cfg);
        assert!(approx_eq(p.home, 0.25));
        assert!(approx_eq(p.away, 0.45 * 0.5));
    }

    #[test]
    fn always_in_unit_interval() {
        let cfg = PressureConfig::default();
        for a in [0u32, 6, 15, 60] {
            for d in [0u32, 3, 9, 30] {
                for s in [0u32, 4, 12] {
                    for poss in [0u32, 35, 50, 100] {
                        let p = score(&metrics(a, d, s, poss), &metrics(d, a, 1, 100 - poss), &cfg);
                        assert!((0.0..=1.0).contains(&p.home));
                        assert!((0.0..=1.0).contains(&p.away));
                    }
                }
            }
        }
    }
}
