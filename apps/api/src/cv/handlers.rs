use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cv::experience::total_experience_years;
use crate::cv::extractor::{categorize_cv, extract_cv_data};
use crate::cv::parser::extract_pdf_text;
use crate::cv::store::{get_cv, insert_cv, list_cvs, upsert_cv_embedding, NewCv};
use crate::errors::AppError;
use crate::models::cv::CvRow;
use crate::models::Pagination;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// An uploaded file pulled out of the multipart body.
struct UploadedPdf {
    filename: String,
    bytes: Bytes,
}

/// POST /api/v1/cvs/upload
///
/// Multipart field `file` (PDF only). Runs the full ingestion pipeline and
/// returns the stored CV.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CvRow>), AppError> {
    let upload = read_pdf_field(multipart).await?;
    info!("Received CV upload '{}' ({} bytes)", upload.filename, upload.bytes.len());

    // 1. Text layer
    let cv_text = extract_pdf_text(upload.bytes.clone()).await?;

    // 2. Structure + categorize
    let data = extract_cv_data(&state.llm, &cv_text).await?;
    let category = categorize_cv(&state.llm, &data).await;
    let total_experience = total_experience_years(&data.work, Utc::now().date_naive());

    // 3. Résumé embedding before any write, so a stored CV always has one
    let embedding = state.embedder.embed(&cv_text).await?;

    // 4. Row + embedding inside a transaction that stays open across the upload
    let s3_key = format!("cvs/{}.pdf", Uuid::new_v4());
    let mut tx = state.db.begin().await?;
    let cv = insert_cv(
        &mut *tx,
        NewCv {
            data: &data,
            category,
            total_experience: i32::try_from(total_experience).unwrap_or(i32::MAX),
            s3_key: Some(&s3_key),
        },
    )
    .await?;
    upsert_cv_embedding(&mut *tx, cv.id, &embedding, state.embedder.model_name()).await?;

    // 5. Original PDF to S3. On failure the transaction rolls back on drop.
    let bucket = &state.config.s3_bucket;
    state
        .s3
        .put_object()
        .bucket(bucket)
        .key(&s3_key)
        .body(ByteStream::from(upload.bytes))
        .content_type(PDF_CONTENT_TYPE)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("CV upload failed: {e}")))?;
    info!("Uploaded CV to s3://{bucket}/{s3_key}");

    // 6. Commit; a failed commit leaves no row, so the object goes too
    if let Err(e) = tx.commit().await {
        discard_upload(&state.s3, bucket, &s3_key).await;
        return Err(e.into());
    }

    Ok((StatusCode::CREATED, Json(cv)))
}

/// GET /api/v1/cvs
pub async fn handle_list_cvs(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<CvRow>>, AppError> {
    let (skip, limit) = page.resolve()?;
    Ok(Json(list_cvs(&state.db, skip, limit).await?))
}

/// GET /api/v1/cvs/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Path(cv_id): Path<i64>,
) -> Result<Json<CvRow>, AppError> {
    let cv = get_cv(&state.db, cv_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CV {cv_id} not found")))?;
    Ok(Json(cv))
}

async fn read_pdf_field(mut multipart: Multipart) -> Result<UploadedPdf, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("cv.pdf").to_string();
        if !is_pdf(field.content_type(), &filename) {
            return Err(AppError::Validation("Only PDF files allowed".to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        return Ok(UploadedPdf { filename, bytes });
    }

    Err(AppError::Validation(
        "Missing multipart field 'file'".to_string(),
    ))
}

/// Best-effort removal of an object whose database row was never committed.
async fn discard_upload(s3: &aws_sdk_s3::Client, bucket: &str, key: &str) {
    match s3.delete_object().bucket(bucket).key(key).send().await {
        Ok(_) => info!("Removed orphaned upload s3://{bucket}/{key}"),
        Err(e) => warn!("Failed to remove orphaned upload s3://{bucket}/{key}: {e}"),
    }
}

/// Content type wins when present; otherwise fall back to the extension.
fn is_pdf(content_type: Option<&str>, filename: &str) -> bool {
    match content_type {
        Some(ct) => ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE),
        None => filename.to_ascii_lowercase().ends_with(".pdf"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_by_content_type() {
        assert!(is_pdf(Some("application/pdf"), "anything"));
        assert!(!is_pdf(Some("image/png"), "cv.pdf"));
    }

    #[test]
    fn test_is_pdf_by_extension() {
        assert!(is_pdf(None, "Jane_Doe.PDF"));
        assert!(!is_pdf(None, "cv.docx"));
    }

    #[tokio::test]
    async fn test_discard_upload_tolerates_unreachable_store() {
        use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .force_path_style(true)
            .build();
        let s3 = aws_sdk_s3::Client::from_conf(config);

        // Logs and returns; the caller still reports the original error
        discard_upload(&s3, "cvs", "cvs/missing.pdf").await;
    }
}
