use crate::models::job::ExperienceRange;

/// Scores a candidate's years of experience against a job's acceptable range.
///
/// 1.0 anywhere inside `[min, max]` (or `[min, ∞)` when `max` is absent).
/// Outside the range the score decays linearly relative to the bound that
/// was missed, so missing a 10-year requirement by one year costs less than
/// missing a 1-year requirement by one year. Floors at 0.0.
///
/// Zero bounds: `min = 0` is always satisfied; `max = 0` gives 0.0 to any
/// candidate with experience.
pub fn match_experience(candidate_years: u32, range: ExperienceRange) -> f64 {
    let years = candidate_years as f64;
    let min = range.min as f64;

    if candidate_years < range.min {
        // range.min > 0 here, the division is safe
        return (1.0 - (min - years) / min).max(0.0);
    }

    match range.max {
        Some(0) if candidate_years > 0 => 0.0,
        Some(max) if candidate_years > max => {
            let max = max as f64;
            (1.0 - (years - max) / max).max(0.0)
        }
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: u32, max: Option<u32>) -> ExperienceRange {
        ExperienceRange { min, max }
    }

    #[test]
    fn test_under_qualified_decays_linearly() {
        let score = match_experience(3, range(5, Some(8)));
        assert!((score - 0.6).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_unbounded_upper_accepts_senior() {
        assert_eq!(match_experience(10, range(2, None)), 1.0);
    }

    #[test]
    fn test_inside_range_is_one() {
        for years in 2..=5 {
            assert_eq!(match_experience(years, range(2, Some(5))), 1.0);
        }
    }

    #[test]
    fn test_over_qualified_decays_linearly() {
        // 1 - (6 - 4) / 4 = 0.5
        let score = match_experience(6, range(2, Some(4)));
        assert!((score - 0.5).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_far_outside_floors_at_zero() {
        assert_eq!(match_experience(0, range(5, Some(8))), 0.0);
        assert_eq!(match_experience(30, range(1, Some(3))), 0.0);
    }

    #[test]
    fn test_min_zero_always_satisfied_from_below() {
        assert_eq!(match_experience(0, range(0, Some(3))), 1.0);
        assert_eq!(match_experience(0, range(0, None)), 1.0);
        assert_eq!(match_experience(7, range(0, None)), 1.0);
    }

    #[test]
    fn test_max_zero() {
        assert_eq!(match_experience(0, range(0, Some(0))), 1.0);
        assert_eq!(match_experience(1, range(0, Some(0))), 0.0);
        assert_eq!(match_experience(12, range(0, Some(0))), 0.0);
    }

    #[test]
    fn test_inverted_range_is_still_exhaustive() {
        // min > max: below min decays from min, above max decays from max.
        let below = match_experience(4, range(5, Some(3)));
        assert!((below - 0.8).abs() < 1e-9, "Score was {below}");
        let above = match_experience(6, range(5, Some(3)));
        assert!((above - 0.0).abs() < 1e-9, "Score was {above}");
    }

    #[test]
    fn test_monotonic_beyond_range() {
        let r = range(4, Some(6));
        let mut previous = 1.0;
        for years in (0..4).rev() {
            let score = match_experience(years, r);
            assert!(score <= previous, "{years} years scored {score} > {previous}");
            previous = score;
        }
        previous = 1.0;
        for years in 7..20 {
            let score = match_experience(years, r);
            assert!(score <= previous, "{years} years scored {score} > {previous}");
            previous = score;
        }
    }

    #[test]
    fn test_scores_bounded() {
        for min in 0..6 {
            for max in [None, Some(0), Some(3), Some(10)] {
                for years in 0..25 {
                    let score = match_experience(years, range(min, max));
                    assert!((0.0..=1.0).contains(&score));
                }
            }
        }
    }
}
