use crate::config::WindowConfig;
use crate::types::Period;

/// Monotonic, rate-limited version of the feed's elapsed minute.
///
/// `prev` is the last smoothed value for the match, `None` on first sight.
/// The first reading is taken as-is; after that the value never goes back
/// and never advances by more than `max_step` per call.
pub fn smooth(prev: Option<f64>, raw: Option<f64>, cfg: &WindowConfig) -> f64 {
    let raw = raw.filter(|m| m.is_finite());
    let next = match (prev, raw) {
        (None, Some(raw)) => raw,
        (None, None) => 0.0,
        (Some(prev), None) => prev,
        (Some(prev), Some(raw)) => raw.max(prev).min(prev + cfg.max_step),
    };
    next.clamp(0.0, cfg.max_minute)
}

/// Signal window containing `minute`, if any. Bounds are inclusive.
pub fn classify(minute: f64, cfg: &WindowConfig) -> Option<Period> {
    if cfg.first_half.contains(minute) {
        Some(Period::FirstHalf)
    } else if cfg.second_half.contains(minute) {
        Some(Period::SecondHalf)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reading_taken_as_is() {
        let cfg = WindowConfig::default();
        assert_eq!(smooth(None, Some(35.0), &cfg), 35.0);
        assert_eq!(smooth(None, None, &cfg), 0.0);
        assert_eq!(smooth(None, Some(120.0), &cfg), 95.0);
    }

    #[test]
    fn regression_is_ignored() {
        let cfg = WindowConfig::default();
        assert_eq!(smooth(Some(40.0), Some(12.0), &cfg), 40.0);
        assert_eq!(smooth(Some(40.0), None, &cfg), 40.0);
    }

    #[test]
    fn jumps_are_capped() {
        let cfg = WindowConfig::default();
        assert_eq!(smooth(Some(20.0), Some(80.0), &cfg), 25.0);
        assert_eq!(smooth(Some(20.0), Some(23.0), &cfg), 23.0);
    }

    #[test]
    fn sequence_properties_hold() {
        let cfg = WindowConfig::default();
        let raws = [
            Some(3.0),
            Some(1.0),
            None,
            Some(30.0),
            Some(29.0),
            Some(f64::NAN),
            Some(45.0),
            Some(90.0),
            Some(200.0),
            Some(-5.0),
            Some(94.0),
            Some(99.0),
            Some(99.0),
        ];
        let mut prev = None;
        for raw in raws {
            let next = smooth(prev, raw, &cfg);
            assert!((0.0..=95.0).contains(&next));
            if let Some(p) = prev {
                assert!(next >= p, "{next} < {p}");
                assert!(next - p <= cfg.max_step + 1e-9);
            }
            prev = Some(next);
        }
    }

    #[test]
    fn classification_partitions_minutes() {
        let cfg = WindowConfig::default();
        assert_eq!(classify(15.0, &cfg), None);
        assert_eq!(classify(29.8, &cfg), Some(Period::FirstHalf));
        assert_eq!(classify(35.0, &cfg), Some(Period::FirstHalf));
        assert_eq!(classify(42.0, &cfg), Some(Period::FirstHalf));
        assert_eq!(classify(42.1, &cfg), None);
        assert_eq!(classify(69.8, &cfg), Some(Period::SecondHalf));
        assert_eq!(classify(93.0, &cfg), Some(Period::SecondHalf));
        assert_eq!(classify(94.0, &cfg), None);

        let mut minute = 0.0;
        while minute <= 95.0 {
            let in_ht = cfg.first_half.contains(minute);
            let in_ft = cfg.second_half.contains(minute);
            assert!(!(in_ht && in_ft));
            minute += 0.1;
        }
    }
}
