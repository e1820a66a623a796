use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use tracing::info;

use crate::embedding::to_pgvector_literal;
use crate::models::job::{JobCreate, JobRow, JobUpdate};

fn years(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

pub async fn insert_job<'e>(
    executor: impl PgExecutor<'e>,
    job: &JobCreate,
) -> Result<JobRow, sqlx::Error> {
    let row: JobRow = sqlx::query_as(
        r#"
        INSERT INTO jobs
            (title, description, experience_min, experience_max, education_required,
             skills_required, company_name, company_industry, company_size,
             location, salary, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(job.title.trim())
    .bind(&job.description)
    .bind(years(job.experience_years.min))
    .bind(job.experience_years.max.map(years))
    .bind(Json(&job.education_required))
    .bind(&job.skills_required)
    .bind(job.company_name.trim())
    .bind(job.company_industry.trim())
    .bind(&job.company_size)
    .bind(&job.location)
    .bind(job.salary)
    .bind(job.expires_at)
    .fetch_one(executor)
    .await?;

    info!("Inserted job {} ('{}' at {})", row.id, row.title, row.company_name);
    Ok(row)
}

/// Replaces every editable field. Returns `None` when the job does not exist.
pub async fn update_job<'e>(
    executor: impl PgExecutor<'e>,
    job_id: i64,
    update: &JobUpdate,
) -> Result<Option<JobRow>, sqlx::Error> {
    let job = &update.job;
    sqlx::query_as(
        r#"
        UPDATE jobs SET
            title = $2,
            description = $3,
            experience_min = $4,
            experience_max = $5,
            education_required = $6,
            skills_required = $7,
            company_name = $8,
            company_industry = $9,
            company_size = $10,
            location = $11,
            salary = $12,
            expires_at = $13,
            is_expired = $14,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(job.title.trim())
    .bind(&job.description)
    .bind(years(job.experience_years.min))
    .bind(job.experience_years.max.map(years))
    .bind(Json(&job.education_required))
    .bind(&job.skills_required)
    .bind(job.company_name.trim())
    .bind(job.company_industry.trim())
    .bind(&job.company_size)
    .bind(&job.location)
    .bind(job.salary)
    .bind(job.expires_at)
    .bind(update.is_expired)
    .fetch_optional(executor)
    .await
}

pub async fn get_job(pool: &PgPool, job_id: i64) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_jobs(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs ORDER BY id OFFSET $1 LIMIT $2")
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// Deletes the job (its embedding cascades). Returns whether a row existed.
pub async fn delete_job(pool: &PgPool, job_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Recommendation candidates: open jobs in the given industry, oldest first.
pub async fn list_open_jobs_in_industry(
    pool: &PgPool,
    industry: &str,
) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM jobs
        WHERE company_industry = $1
          AND is_expired = FALSE
          AND (expires_at IS NULL OR expires_at > NOW())
        ORDER BY id
        "#,
    )
    .bind(industry)
    .fetch_all(pool)
    .await
}

/// Stores (or replaces) the description embedding for a job.
pub async fn upsert_job_embedding<'e>(
    executor: impl PgExecutor<'e>,
    job_id: i64,
    embedding: &[f32],
    model_name: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO job_embeddings (job_id, embedding, model_name)
        VALUES ($1, $2::text::vector, $3)
        ON CONFLICT (job_id) DO UPDATE
        SET embedding = EXCLUDED.embedding,
            model_name = EXCLUDED.model_name,
            created_at = NOW()
        "#,
    )
    .bind(job_id)
    .bind(to_pgvector_literal(embedding))
    .bind(model_name)
    .execute(executor)
    .await?;

    Ok(())
}
