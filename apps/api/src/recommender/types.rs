use serde::{Deserialize, Serialize};

use crate::models::cv::{CvRow, EducationRecord};
use crate::models::job::{EducationRequirement, ExperienceRange, JobRow};

/// Candidate side of a match. Built per request from a stored CV; never mutated.
#[derive(Debug, Clone, Default)]
pub struct CandidateProfile {
    pub id: i64,
    pub skills: Vec<String>,
    /// Whole years.
    pub total_experience: u32,
    pub education: Vec<EducationRecord>,
}

impl From<&CvRow> for CandidateProfile {
    fn from(cv: &CvRow) -> Self {
        Self {
            id: cv.id,
            skills: cv.skills.clone(),
            total_experience: cv.total_experience.max(0) as u32,
            education: cv.education.0.clone(),
        }
    }
}

/// Job side of a match.
#[derive(Debug, Clone, Default)]
pub struct JobPosting {
    pub id: i64,
    pub skills_required: Vec<String>,
    pub experience: ExperienceRange,
    pub education_required: EducationRequirement,
}

impl From<&JobRow> for JobPosting {
    fn from(job: &JobRow) -> Self {
        Self {
            id: job.id,
            skills_required: job.skills_required.clone(),
            experience: job.experience_range(),
            education_required: job.education_required.0.clone(),
        }
    }
}

/// Per-signal sub-scores, each in [0, 1] and rounded to 3 decimals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchingFactors {
    pub skills_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
    pub semantic_similarity: f64,
}

/// One ranked, explained match. Owned by the caller once returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub job_id: i64,
    pub match_score: f64,
    pub matching_factors: MatchingFactors,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub explanation: String,
}

/// Rounds to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.12345), 0.123);
        assert_eq!(round3(0.9996), 1.0);
        assert_eq!(round3(0.0), 0.0);
    }
}
