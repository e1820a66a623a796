use serde::Serialize;

/// Weights of the composite match score. Semantic similarity dominates because
/// it is the only signal that sees the full CV and job description text.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MatchWeights {
    pub semantic: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

pub const MATCH_WEIGHTS: MatchWeights = MatchWeights {
    semantic: 0.45,
    skills: 0.30,
    experience: 0.15,
    education: 0.10,
};

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.semantic + self.skills + self.experience + self.education
    }

    /// Composite: 0.45*semantic + 0.30*skills + 0.15*experience + 0.10*education
    pub fn combine(&self, semantic: f64, skills: f64, experience: f64, education: f64) -> f64 {
        self.semantic * semantic
            + self.skills * skills
            + self.experience * experience
            + self.education * education
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        assert!((MATCH_WEIGHTS.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_all_ones_is_one() {
        let score = MATCH_WEIGHTS.combine(1.0, 1.0, 1.0, 1.0);
        assert!((score - 1.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_combine_partial() {
        // 0.45*0.8 + 0.30*0.5 + 0.15*1.0 + 0.10*0.4 = 0.36 + 0.15 + 0.15 + 0.04 = 0.70
        let score = MATCH_WEIGHTS.combine(0.8, 0.5, 1.0, 0.4);
        assert!((score - 0.70).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_combine_stays_in_unit_interval() {
        let steps = [0.0, 0.25, 0.5, 0.75, 1.0];
        for s in steps {
            for k in steps {
                for e in steps {
                    for d in steps {
                        let score = MATCH_WEIGHTS.combine(s, k, e, d);
                        assert!((0.0..=1.0 + 1e-12).contains(&score), "Score was {score}");
                    }
                }
            }
        }
    }
}
