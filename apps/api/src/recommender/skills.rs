use std::collections::HashSet;

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SkillMatch {
    pub score: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Case-insensitive overlap of a candidate's skills with a job's required skills.
///
/// `matched` and `missing` keep the job's order and together cover every
/// distinct normalized required skill. A job with no required skills scores
/// 0.0, not a vacuous 1.0.
pub fn match_skills(candidate_skills: &[String], required_skills: &[String]) -> SkillMatch {
    let candidate: HashSet<String> = candidate_skills
        .iter()
        .filter_map(|s| normalize_skill(s))
        .collect();

    let mut seen = HashSet::new();
    let required: Vec<String> = required_skills
        .iter()
        .filter_map(|s| normalize_skill(s))
        .filter(|s| seen.insert(s.clone()))
        .collect();

    if required.is_empty() {
        return SkillMatch::default();
    }

    let (matched, missing): (Vec<String>, Vec<String>) =
        required.into_iter().partition(|s| candidate.contains(s));

    let score = matched.len() as f64 / (matched.len() + missing.len()) as f64;

    SkillMatch {
        score,
        matched,
        missing,
    }
}

/// Lower-cases and trims; blank entries are dropped.
fn normalize_skill(skill: &str) -> Option<String> {
    let normalized = skill.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
