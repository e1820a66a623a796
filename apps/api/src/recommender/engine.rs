//! Recommendation engine: ranks a candidate's pre-filtered jobs by a weighted
//! blend of four signals and explains each match.
//!
//! Per call:
//! 1. One batched semantic-similarity lookup for all jobs (the expensive signal)
//! 2. Per job: skills, experience, education sub-scores; semantic from the map
//!    (0.0 when the job has no stored embedding)
//! 3. composite = 0.45*semantic + 0.30*skills + 0.15*experience + 0.10*education
//! 4. Stable sort by composite descending, truncate to top_k
//!
//! Any collaborator failure aborts the whole call. There is no partial result.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::embedding::{Embedder, EmbeddingError};
use crate::recommender::education::EducationScorer;
use crate::recommender::experience::match_experience;
use crate::recommender::similarity::{LookupError, SimilarityLookup};
use crate::recommender::skills::{match_skills, SkillMatch};
use crate::recommender::types::{round3, CandidateProfile, JobPosting, MatchResult, MatchingFactors};
use crate::recommender::weights::MATCH_WEIGHTS;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Semantic similarity lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Education scoring failed for job {job_id}: {source}")]
    Education {
        job_id: i64,
        #[source]
        source: EmbeddingError,
    },
}

/// Stateless scoring service. Collaborators are injected so tests can swap
/// them; nothing is retained between calls.
#[derive(Clone)]
pub struct Recommender {
    embedder: Arc<dyn Embedder>,
    lookup: Arc<dyn SimilarityLookup>,
}

impl Recommender {
    pub fn new(embedder: Arc<dyn Embedder>, lookup: Arc<dyn SimilarityLookup>) -> Self {
        Self { embedder, lookup }
    }

    /// Ranks `jobs` for `candidate` and returns at most `top_k` results.
    ///
    /// An empty `Ok` means there was nothing to rank; failures are always `Err`.
    pub async fn recommend(
        &self,
        candidate: &CandidateProfile,
        jobs: &[JobPosting],
        top_k: usize,
    ) -> Result<Vec<MatchResult>, RecommendError> {
        if jobs.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let job_ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();
        let semantic_scores = self.lookup.lookup(candidate.id, &job_ids).await?;

        let mut education = EducationScorer::new(self.embedder.as_ref(), &candidate.education);
        let mut results = Vec::with_capacity(jobs.len());

        for job in jobs {
            let result = score_job(candidate, job, &semantic_scores, &mut education).await?;
            results.push(result);
        }

        // sort_by is stable: equal scores keep input order
        results.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        results.truncate(top_k);

        Ok(results)
    }
}

async fn score_job(
    candidate: &CandidateProfile,
    job: &JobPosting,
    semantic_scores: &HashMap<i64, f64>,
    education: &mut EducationScorer<'_>,
) -> Result<MatchResult, RecommendError> {
    let skills = match_skills(&candidate.skills, &job.skills_required);
    let experience = match_experience(candidate.total_experience, job.experience);
    let education_score = education
        .score(&job.education_required)
        .await
        .map_err(|source| RecommendError::Education {
            job_id: job.id,
            source,
        })
        .map(unit_score)?;
    let semantic = unit_score(semantic_scores.get(&job.id).copied().unwrap_or(0.0));

    let composite = MATCH_WEIGHTS.combine(semantic, skills.score, experience, education_score);

    debug!(
        "Job {}: composite={:.3} semantic={:.3} skills={:.3} experience={:.3} education={:.3}",
        job.id, composite, semantic, skills.score, experience, education_score
    );

    let explanation = build_explanation(composite, &skills, candidate.total_experience);

    Ok(MatchResult {
        job_id: job.id,
        match_score: round3(composite),
        matching_factors: MatchingFactors {
            skills_match: round3(skills.score),
            experience_match: round3(experience),
            education_match: round3(education_score),
            semantic_similarity: round3(semantic),
        },
        matched_skills: skills.matched,
        missing_skills: skills.missing,
        explanation,
    })
}

/// Clamps a similarity into [0, 1]. NaN (pgvector's distance to an all-zero
/// vector) and infinities score 0.0.
fn unit_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Threshold-based explanation from the unrounded composite score.
fn build_explanation(score: f64, skills: &SkillMatch, candidate_years: u32) -> String {
    if score >= 0.9 {
        format!(
            "Excellent match with {} matching skills and {candidate_years}+ years experience",
            skills.matched.len()
        )
    } else if score >= 0.7 {
        format!(
            "Strong match with {} core skills aligned",
            skills.matched.len()
        )
    } else {
        format!(
            "Potential match but may need development in {} areas",
            skills.missing.len()
        )
    }
}
