use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cv::store::get_cv;
use crate::errors::AppError;
use crate::jobs::store::list_open_jobs_in_industry;
use crate::models::job::JobRow;
use crate::recommender::types::{CandidateProfile, JobPosting, MatchResult, MatchingFactors};
use crate::state::AppState;

pub const MAX_TOP_K: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub top_k: Option<usize>,
}

/// A ranked match joined back to the job it scores.
#[derive(Debug, Serialize)]
pub struct JobRecommendation {
    pub job_id: i64,
    pub title: String,
    pub company_name: String,
    pub location: Option<String>,
    pub match_score: f64,
    pub matching_factors: MatchingFactors,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub explanation: String,
}

impl JobRecommendation {
    fn new(result: MatchResult, job: &JobRow) -> Self {
        Self {
            job_id: result.job_id,
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            location: job.location.clone(),
            match_score: result.match_score,
            matching_factors: result.matching_factors,
            matched_skills: result.matched_skills,
            missing_skills: result.missing_skills,
            explanation: result.explanation,
        }
    }
}

/// Resolves the requested `top_k` against the configured default and bounds.
pub fn resolve_top_k(requested: Option<usize>, default: usize) -> Result<usize, AppError> {
    let top_k = requested.unwrap_or(default);
    if !(1..=MAX_TOP_K).contains(&top_k) {
        return Err(AppError::Validation(format!(
            "top_k must be between 1 and {MAX_TOP_K}, got {top_k}"
        )));
    }
    Ok(top_k)
}

/// GET /api/v1/recommendations/:cv_id
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Path(cv_id): Path<i64>,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<Vec<JobRecommendation>>, AppError> {
    let top_k = resolve_top_k(params.top_k, state.config.default_top_k)?;

    let cv = get_cv(&state.db, cv_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CV {cv_id} not found")))?;

    let jobs = list_open_jobs_in_industry(&state.db, &cv.category).await?;
    info!(
        "Scoring {} open '{}' jobs for CV {cv_id} (top_k={top_k})",
        jobs.len(),
        cv.category
    );

    let candidate = CandidateProfile::from(&cv);
    let postings: Vec<JobPosting> = jobs.iter().map(JobPosting::from).collect();

    let results = state
        .recommender
        .recommend(&candidate, &postings, top_k)
        .await?;

    let recommendations = results
        .into_iter()
        .filter_map(|result| {
            jobs.iter()
                .find(|job| job.id == result.job_id)
                .map(|job| JobRecommendation::new(result, job))
        })
        .collect();

    Ok(Json(recommendations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_defaults() {
        assert_eq!(resolve_top_k(None, 10).unwrap(), 10);
    }

    #[test]
    fn test_top_k_bounds() {
        assert_eq!(resolve_top_k(Some(1), 10).unwrap(), 1);
        assert_eq!(resolve_top_k(Some(100), 10).unwrap(), 100);
        assert!(matches!(resolve_top_k(Some(0), 10), Err(AppError::Validation(_))));
        assert!(matches!(resolve_top_k(Some(101), 10), Err(AppError::Validation(_))));
    }
}
