//! Education fit: embedding similarity between what the candidate studied and
//! what the job asks for. Catches "BSc Computer Science" vs "Bachelor's in CS",
//! which exact string comparison would miss.

use std::collections::HashMap;

use crate::embedding::{cosine_similarity, Embedder, EmbeddingError};
use crate::models::cv::EducationRecord;
use crate::models::job::EducationRequirement;

/// One line per record: institution, degree, field, GPA, date range.
/// Absent or blank fields are skipped; records with nothing left are dropped.
pub fn render_candidate_education(records: &[EducationRecord]) -> String {
    records
        .iter()
        .map(|edu| {
            let gpa = present(&edu.gpa).map(|g| format!("GPA: {g}"));
            let date_range = match (present(&edu.start_date), present(&edu.end_date)) {
                (None, None) => None,
                (start, end) => Some(
                    format!("{} to {}", start.unwrap_or(""), end.unwrap_or(""))
                        .trim()
                        .to_string(),
                ),
            };

            [
                present(&edu.institution).map(str::to_string),
                present(&edu.degree).map(str::to_string),
                present(&edu.field).map(str::to_string),
                gpa,
                date_range,
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Required Degree X (Restriction: Y) Required Field Z`, omitting absent parts.
/// A restriction without a degree is dropped.
pub fn render_job_education(requirement: &EducationRequirement) -> String {
    let mut parts = Vec::new();

    if let Some(degree) = present(&requirement.required_degree) {
        let mut degree_part = format!("Required Degree {degree}");
        if let Some(restriction) = present(&requirement.degree_restriction) {
            degree_part.push_str(&format!(" (Restriction: {restriction})"));
        }
        parts.push(degree_part);
    }

    if let Some(field) = present(&requirement.required_field) {
        parts.push(format!("Required Field {field}"));
    }

    parts.join(" ")
}

/// Cosine similarity in [-1, 1] between the rendered candidate education and
/// the rendered job requirement. Either side rendering empty scores 0.0
/// without an embedding call. Embedding failures propagate.
pub async fn match_education(
    embedder: &dyn Embedder,
    records: &[EducationRecord],
    requirement: &EducationRequirement,
) -> Result<f64, EmbeddingError> {
    EducationScorer::new(embedder, records)
        .score(requirement)
        .await
}

/// Scores one candidate against many requirements, embedding the candidate
/// text once and each distinct requirement text once. Lives for one
/// recommendation call.
pub struct EducationScorer<'a> {
    embedder: &'a dyn Embedder,
    candidate_text: String,
    candidate_vector: Option<Vec<f32>>,
    requirement_vectors: HashMap<String, Vec<f32>>,
}

impl<'a> EducationScorer<'a> {
    pub fn new(embedder: &'a dyn Embedder, records: &[EducationRecord]) -> Self {
        Self {
            embedder,
            candidate_text: render_candidate_education(records),
            candidate_vector: None,
            requirement_vectors: HashMap::new(),
        }
    }

    pub async fn score(&mut self, requirement: &EducationRequirement) -> Result<f64, EmbeddingError> {
        let job_text = render_job_education(requirement);
        if self.candidate_text.is_empty() || job_text.is_empty() {
            return Ok(0.0);
        }

        if self.candidate_vector.is_none() {
            self.candidate_vector = Some(self.embedder.embed(&self.candidate_text).await?);
        }

        if !self.requirement_vectors.contains_key(&job_text) {
            let vector = self.embedder.embed(&job_text).await?;
            self.requirement_vectors.insert(job_text.clone(), vector);
        }

        let (Some(candidate), Some(job)) = (
            self.candidate_vector.as_deref(),
            self.requirement_vectors.get(&job_text),
        ) else {
            return Ok(0.0);
        };

        Ok(cosine_similarity(candidate, job))
    }
}

/// Trimmed, non-empty value of an optional field.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommender::test_support::KeywordEmbedder;

    fn record(
        institution: &str,
        degree: Option<&str>,
        field: Option<&str>,
        gpa: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> EducationRecord {
        EducationRecord {
            institution: Some(institution.to_string()),
            degree: degree.map(String::from),
            field: field.map(String::from),
            start_date: start.map(String::from),
            end_date: end.map(String::from),
            gpa: gpa.map(String::from),
        }
    }

    fn requirement(degree: Option<&str>, restriction: Option<&str>, field: Option<&str>) -> EducationRequirement {
        EducationRequirement {
            required_degree: degree.map(String::from),
            degree_restriction: restriction.map(String::from),
            required_field: field.map(String::from),
        }
    }

    #[test]
    fn test_render_candidate_full_record() {
        let text = render_candidate_education(&[record(
            "MIT",
            Some("BSc"),
            Some("Computer Science"),
            Some("3.9"),
            Some("2015"),
            Some("2019"),
        )]);
        assert_eq!(text, "MIT BSc Computer Science GPA: 3.9 2015 to 2019");
    }

    #[test]
    fn test_render_candidate_skips_absent_fields() {
        let text = render_candidate_education(&[
            record("ETH", None, Some("Physics"), None, None, None),
            record("EPFL", Some("MSc"), None, Some(""), Some("2020"), None),
        ]);
        assert_eq!(text, "ETH Physics\nEPFL MSc 2020 to");
        assert!(!text.contains("  "));
    }

    #[test]
    fn test_render_candidate_end_only() {
        let text = render_candidate_education(&[record("UCL", None, None, None, None, Some("2021"))]);
        assert_eq!(text, "UCL to 2021");
    }

    #[test]
    fn test_render_candidate_empty() {
        assert_eq!(render_candidate_education(&[]), "");
        assert_eq!(render_candidate_education(&[EducationRecord::default()]), "");
    }

    #[test]
    fn test_render_job_all_parts() {
        let text = render_job_education(&requirement(
            Some("Bachelor"),
            Some("STEM only"),
            Some("Computer Science"),
        ));
        assert_eq!(
            text,
            "Required Degree Bachelor (Restriction: STEM only) Required Field Computer Science"
        );
    }

    #[test]
    fn test_render_job_field_only() {
        let text = render_job_education(&requirement(None, Some("ignored"), Some("Law")));
        assert_eq!(text, "Required Field Law");
    }

    #[test]
    fn test_render_job_blank() {
        assert_eq!(render_job_education(&requirement(Some(" "), None, Some(""))), "");
    }

    #[tokio::test]
    async fn test_match_education_related_text_scores_high() {
        let embedder = KeywordEmbedder::default();
        let score = match_education(
            &embedder,
            &[record("MIT", Some("Bachelor"), Some("Computer Science"), None, None, None)],
            &requirement(Some("Bachelor"), None, Some("Computer Science")),
        )
        .await
        .unwrap();
        assert!(score > 0.4, "Score was {score}");
    }

    #[tokio::test]
    async fn test_match_education_unrelated_text_scores_low() {
        let embedder = KeywordEmbedder::default();
        let related = match_education(
            &embedder,
            &[record("MIT", Some("Bachelor"), Some("Computer Science"), None, None, None)],
            &requirement(Some("Bachelor"), None, Some("Computer Science")),
        )
        .await
        .unwrap();
        let unrelated = match_education(
            &embedder,
            &[record("MIT", Some("Bachelor"), Some("Computer Science"), None, None, None)],
            &requirement(Some("Doctorate"), None, Some("Medicine")),
        )
        .await
        .unwrap();
        assert!(unrelated < related, "{unrelated} >= {related}");
    }

    #[tokio::test]
    async fn test_match_education_empty_side_skips_embedder() {
        let embedder = KeywordEmbedder::default();
        let score = match_education(&embedder, &[], &requirement(Some("Bachelor"), None, None))
            .await
            .unwrap();
        assert_eq!(score, 0.0);

        let score = match_education(
            &embedder,
            &[record("MIT", Some("BSc"), None, None, None, None)],
            &EducationRequirement::default(),
        )
        .await
        .unwrap();
        assert_eq!(score, 0.0);
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_match_education_propagates_embedding_failure() {
        let embedder = KeywordEmbedder::failing();
        let result = match_education(
            &embedder,
            &[record("MIT", Some("BSc"), None, None, None, None)],
            &requirement(Some("Bachelor"), None, None),
        )
        .await;
        assert!(matches!(result, Err(EmbeddingError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_scorer_reuses_vectors_across_jobs() {
        let embedder = KeywordEmbedder::default();
        let records = [record("MIT", Some("BSc"), Some("Physics"), None, None, None)];
        let mut scorer = EducationScorer::new(&embedder, &records);

        let req = requirement(Some("BSc"), None, Some("Physics"));
        let first = scorer.score(&req).await.unwrap();
        let second = scorer.score(&req).await.unwrap();
        scorer
            .score(&requirement(Some("MSc"), None, None))
            .await
            .unwrap();

        assert_eq!(first, second);
        // candidate once + two distinct requirement texts
        assert_eq!(embedder.calls(), 3);
    }
}
