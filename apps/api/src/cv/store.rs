use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use tracing::info;

use crate::embedding::to_pgvector_literal;
use crate::models::cv::{CvData, CvRow};

/// Everything needed to persist a freshly ingested CV.
pub struct NewCv<'a> {
    pub data: &'a CvData,
    pub category: &'a str,
    pub total_experience: i32,
    pub s3_key: Option<&'a str>,
}

pub async fn insert_cv<'e>(
    executor: impl PgExecutor<'e>,
    cv: NewCv<'_>,
) -> Result<CvRow, sqlx::Error> {
    let NewCv {
        data,
        category,
        total_experience,
        s3_key,
    } = cv;

    let row: CvRow = sqlx::query_as(
        r#"
        INSERT INTO cvs
            (name, email, phone, location, summary, work, education,
             skills, languages, certifications, category, total_experience, s3_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(data.location.as_ref().map(Json))
    .bind(&data.summary)
    .bind(Json(&data.work))
    .bind(Json(&data.education))
    .bind(&data.skills)
    .bind(&data.languages)
    .bind(&data.certifications)
    .bind(category)
    .bind(total_experience)
    .bind(s3_key)
    .fetch_one(executor)
    .await?;

    info!("Inserted CV {} ('{}', category '{}')", row.id, row.name, row.category);
    Ok(row)
}

pub async fn get_cv(pool: &PgPool, cv_id: i64) -> Result<Option<CvRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cvs WHERE id = $1")
        .bind(cv_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_cvs(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<CvRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cvs ORDER BY id OFFSET $1 LIMIT $2")
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// Stores (or replaces) the résumé embedding used for semantic similarity.
pub async fn upsert_cv_embedding<'e>(
    executor: impl PgExecutor<'e>,
    cv_id: i64,
    embedding: &[f32],
    model_name: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cv_embeddings (cv_id, embedding, model_name)
        VALUES ($1, $2::text::vector, $3)
        ON CONFLICT (cv_id) DO UPDATE
        SET embedding = EXCLUDED.embedding,
            model_name = EXCLUDED.model_name,
            created_at = NOW()
        "#,
    )
    .bind(cv_id)
    .bind(to_pgvector_literal(embedding))
    .bind(model_name)
    .execute(executor)
    .await?;

    Ok(())
}
