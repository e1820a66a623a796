use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::embedding::Embedder;
use crate::llm_client::LlmClient;
use crate::recommender::Recommender;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Redis-cached embedding client. Used for résumé and job vectors at
    /// write time and shared with the recommender for education text.
    pub embedder: Arc<dyn Embedder>,
    pub recommender: Arc<Recommender>,
}
