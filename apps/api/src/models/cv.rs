use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub city: Option<String>,
    #[serde(rename = "countryCode", alias = "country_code")]
    pub country_code: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkExperience {
    pub company: Option<String>,
    pub position: Option<String>,
    #[serde(rename = "startDate", alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", alias = "end_date")]
    pub end_date: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// One education entry as extracted from a CV. Any field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EducationRecord {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    #[serde(rename = "startDate", alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub gpa: Option<String>,
}

/// Structured CV data returned by the LLM extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvData {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<Location>,
    pub summary: Option<String>,
    #[serde(default)]
    pub work: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<EducationRecord>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<Json<Location>>,
    pub summary: Option<String>,
    pub work: Json<Vec<WorkExperience>>,
    pub education: Json<Vec<EducationRecord>>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    pub category: String,
    pub total_experience: i32,
    pub s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// LLMs return GPAs as either `"3.8"` or `3.8`; both land as a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_record_accepts_camel_case_dates() {
        let record: EducationRecord = serde_json::from_str(
            r#"{"institution": "MIT", "degree": "BSc", "startDate": "2015", "endDate": "2019"}"#,
        )
        .unwrap();
        assert_eq!(record.start_date.as_deref(), Some("2015"));
        assert_eq!(record.end_date.as_deref(), Some("2019"));
        assert!(record.field.is_none());
    }

    #[test]
    fn test_education_record_numeric_gpa() {
        let record: EducationRecord =
            serde_json::from_str(r#"{"institution": "MIT", "gpa": 3.8}"#).unwrap();
        assert_eq!(record.gpa.as_deref(), Some("3.8"));
    }

    #[test]
    fn test_education_record_null_gpa() {
        let record: EducationRecord =
            serde_json::from_str(r#"{"institution": "MIT", "gpa": null}"#).unwrap();
        assert!(record.gpa.is_none());
    }

    #[test]
    fn test_cv_data_tolerates_missing_lists() {
        let data: CvData = serde_json::from_str(r#"{"name": "Ada", "email": null}"#).unwrap();
        assert_eq!(data.name, "Ada");
        assert!(data.skills.is_empty());
        assert!(data.work.is_empty());
    }
}
