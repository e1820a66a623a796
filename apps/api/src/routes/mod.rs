pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cv::handlers as cv;
use crate::jobs::handlers as jobs;
use crate::recommender::handlers as recommendations;
use crate::state::AppState;

/// Upper bound for a multipart CV upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CVs
        .route("/api/v1/cvs", get(cv::handle_list_cvs))
        .route(
            "/api/v1/cvs/upload",
            post(cv::handle_upload_cv).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/cvs/:id", get(cv::handle_get_cv))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Recommendations
        .route(
            "/api/v1/recommendations/:cv_id",
            get(recommendations::handle_get_recommendations),
        )
        .with_state(state)
}
