use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Similarity query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Similarity backend unavailable: {0}")]
    Unavailable(String),
}

/// Batched access to precomputed résumé-vs-job similarity.
///
/// Returns `job_id -> similarity` for the requested jobs. Jobs without a
/// stored embedding (or a candidate without one) are simply absent from the
/// map; callers treat absence as 0.0. A failure fails the whole batch.
#[async_trait]
pub trait SimilarityLookup: Send + Sync {
    async fn lookup(
        &self,
        candidate_id: i64,
        job_ids: &[i64],
    ) -> Result<HashMap<i64, f64>, LookupError>;
}

/// pgvector-backed lookup. Similarity is `1 - cosine distance` over the stored
/// vectors, computed by Postgres in a single query.
#[derive(Clone)]
pub struct PgSimilarityLookup {
    pool: PgPool,
}

impl PgSimilarityLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SimilarityLookup for PgSimilarityLookup {
    async fn lookup(
        &self,
        candidate_id: i64,
        job_ids: &[i64],
    ) -> Result<HashMap<i64, f64>, LookupError> {
        if job_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, f64)> = sqlx::query_as(
            r#"
            SELECT j.job_id, (1 - (c.embedding <=> j.embedding))::float8 AS similarity
            FROM cv_embeddings c
            JOIN job_embeddings j ON j.job_id = ANY($2)
            WHERE c.cv_id = $1
            "#,
        )
        .bind(candidate_id)
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Similarity lookup for CV {candidate_id}: {}/{} jobs have embeddings",
            rows.len(),
            job_ids.len()
        );

        Ok(rows.into_iter().collect())
    }
}
