use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::store::{
    delete_job, get_job, insert_job, list_jobs, update_job, upsert_job_embedding,
};
use crate::models::job::{JobCreate, JobRow, JobUpdate};
use crate::models::Pagination;
use crate::state::AppState;

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(job): Json<JobCreate>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    job.validate().map_err(AppError::Validation)?;

    let embedding = state.embedder.embed(&job.to_embedding_text()).await?;

    let mut tx = state.db.begin().await?;
    let row = insert_job(&mut *tx, &job).await?;
    upsert_job_embedding(&mut *tx, row.id, &embedding, state.embedder.model_name()).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let (skip, limit) = page.resolve()?;
    Ok(Json(list_jobs(&state.db, skip, limit).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<JobRow>, AppError> {
    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    Ok(Json(job))
}

/// PUT /api/v1/jobs/:id
///
/// Full replacement, `is_expired` included: omitting it is a 422 rather than
/// a reset. The description embedding is regenerated so semantic similarity
/// tracks the new text.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(update): Json<JobUpdate>,
) -> Result<Json<JobRow>, AppError> {
    update.job.validate().map_err(AppError::Validation)?;

    if get_job(&state.db, job_id).await?.is_none() {
        return Err(job_not_found(job_id));
    }

    let embedding = state.embedder.embed(&update.job.to_embedding_text()).await?;

    let mut tx = state.db.begin().await?;
    let row = update_job(&mut *tx, job_id, &update)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    upsert_job_embedding(&mut *tx, row.id, &embedding, state.embedder.model_name()).await?;
    tx.commit().await?;

    info!("Updated job {job_id} and refreshed its embedding");
    Ok(Json(row))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !delete_job(&state.db, job_id).await? {
        return Err(job_not_found(job_id));
    }
    info!("Deleted job {job_id}");
    Ok(StatusCode::NO_CONTENT)
}

fn job_not_found(job_id: i64) -> AppError {
    AppError::NotFound(format!("Job {job_id} not found"))
}
