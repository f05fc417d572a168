/// Win/push/lose estimate for one "over" corner line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEstimate {
    pub line: f64,
    pub p_win: f64,
    pub p_push: f64,
    pub p_lose: f64,
}

/// P(X = k) for X ~ Poisson(lambda).
pub fn poisson_pmf(k: u32, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    let mut p = (-lambda).exp();
    for i in 1..=k {
        p *= lambda / i as f64;
    }
    p
}

/// P(X >= k) for X ~ Poisson(lambda).
pub fn poisson_tail_ge(k: i64, lambda: f64) -> f64 {
    if k <= 0 {
        return 1.0;
    }
    let below: f64 = (0..k as u32).map(|i| poisson_pmf(i, lambda)).sum();
    (1.0 - below).clamp(0.0, 1.0)
}

fn is_integer_line(line: f64) -> bool {
    line.fract() == 0.0
}

/// Estimate an over-`line` bet given `total` corners so far and `lambda`
/// expected further corners.
///
/// An integer line pushes when the final total lands exactly on it; a
/// fractional line can never push.
pub fn estimate_line(line: f64, total: u32, lambda: f64) -> LineEstimate {
    let total = total as i64;
    if is_integer_line(line) {
        let l = line as i64;
        let p_win = poisson_tail_ge(l + 1 - total, lambda);
        let needed = l - total;
        let p_push = if needed >= 0 {
            poisson_pmf(needed as u32, lambda)
        } else {
            0.0
        };
        LineEstimate {
            line,
            p_win,
            p_push,
            p_lose: (1.0 - p_win - p_push).max(0.0),
        }
    } else {
        let needed = line.ceil() as i64 - total;
        let p_win = poisson_tail_ge(needed, lambda);
        LineEstimate {
            line,
            p_win,
            p_push: 0.0,
            p_lose: 1.0 - p_win,
        }
    }
}

/// Estimates for every candidate line, best `p_win` first.
pub fn evaluate_candidate_lines(candidates: &[f64], total: u32, lambda: f64) -> Vec<LineEstimate> {
    let mut out: Vec<LineEstimate> = candidates
        .iter()
        .map(|line| estimate_line(*line, total, lambda))
        .collect();
    out.sort_by(|a, b| b.p_win.total_cmp(&a.p_win));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    const CANDIDATES: [f64; 5] = [3.5, 4.0, 4.5, 5.0, 5.5];

    #[test]
    fn pmf_sums_to_one() {
        let total: f64 = (0..60).map(|k| poisson_pmf(k, 1.5)).sum();
        assert!(approx_eq(total, 1.0));
        assert!(approx_eq(poisson_pmf(0, 1.5), (-1.5f64).exp()));
    }

    #[test]
    fn tail_of_non_positive_k_is_certain() {
        assert_eq!(poisson_tail_ge(0, 1.5), 1.0);
        assert_eq!(poisson_tail_ge(-3, 1.5), 1.0);
    }

    #[test]
    fn scenario_e_sorted_and_fractional_push_is_zero() {
        let lines = evaluate_candidate_lines(&CANDIDATES, 4, 1.5);
        assert_eq!(lines.len(), 5);
        for pair in lines.windows(2) {
            assert!(pair[0].p_win >= pair[1].p_win);
        }
        let l35 = lines.iter().find(|l| l.line == 3.5).expect("3.5 present");
        assert_eq!(l35.p_push, 0.0);
        assert_eq!(l35.p_win, 1.0);
        assert_eq!(lines[0].line, 3.5);
    }

    #[test]
    fn integer_line_probabilities_partition() {
        for total in 0..8 {
            for line in [4.0, 5.0, 8.0] {
                let e = estimate_line(line, total, 1.5);
                assert!(approx_eq(e.p_win + e.p_push + e.p_lose, 1.0));
            }
        }
    }

    #[test]
    fn integer_line_push_mass() {
        // total 4, over 5.0: win needs 2+, push on exactly 1.
        let e = estimate_line(5.0, 4, 1.5);
        assert!(approx_eq(e.p_push, poisson_pmf(1, 1.5)));
        assert!(approx_eq(e.p_win, poisson_tail_ge(2, 1.5)));

        // total 4, over 4.0: win needs 1+, push on 0.
        let e = estimate_line(4.0, 4, 1.5);
        assert!(approx_eq(e.p_push, (-1.5f64).exp()));
    }

    #[test]
    fn already_beaten_integer_line() {
        let e = estimate_line(4.0, 6, 1.5);
        assert_eq!(e.p_win, 1.0);
        assert_eq!(e.p_push, 0.0);
        assert_eq!(e.p_lose, 0.0);
    }

    #[test]
    fn fractional_lines_never_push() {
        for total in 0..8 {
            for line in [3.5, 4.5, 5.5] {
                let e = estimate_line(line, total, 1.5);
                assert_eq!(e.p_push, 0.0);
                assert!(approx_eq(e.p_win + e.p_lose, 1.0));
            }
        }
    }
}
