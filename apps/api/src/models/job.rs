use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Acceptable years-of-experience window. `max = None` means no upper bound.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperienceRange {
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
}

/// Education requirement of a job. Empty strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EducationRequirement {
    pub required_degree: Option<String>,
    pub degree_restriction: Option<String>,
    pub required_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub experience_min: i32,
    pub experience_max: Option<i32>,
    pub education_required: Json<EducationRequirement>,
    pub skills_required: Vec<String>,
    pub company_name: String,
    pub company_industry: String,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub salary: Option<f64>,
    pub is_expired: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn experience_range(&self) -> ExperienceRange {
        ExperienceRange {
            min: self.experience_min.max(0) as u32,
            max: self.experience_max.map(|m| m.max(0) as u32),
        }
    }
}

/// Request body for creating a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreate {
    pub title: String,
    pub description: String,
    pub experience_years: ExperienceRange,
    #[serde(default)]
    pub education_required: EducationRequirement,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub company_name: String,
    pub company_industry: String,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub salary: Option<f64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for replacing a job. Same shape as create, plus the expiry
/// flag, which is required so a PUT never silently reopens an expired job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobUpdate {
    #[serde(flatten)]
    pub job: JobCreate,
    pub is_expired: bool,
}

impl JobCreate {
    /// Returns the first validation problem, if any.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("company_name", &self.company_name),
            ("company_industry", &self.company_industry),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }
        if let Some(max) = self.experience_years.max {
            if max < self.experience_years.min {
                return Err(format!(
                    "experience_years.max ({max}) must be >= experience_years.min ({})",
                    self.experience_years.min
                ));
            }
        }
        if let Some(salary) = self.salary {
            if salary < 0.0 {
                return Err("salary cannot be negative".to_string());
            }
        }
        Ok(())
    }

    /// Text embedded as the job's description vector.
    pub fn to_embedding_text(&self) -> String {
        let experience = match self.experience_years.max {
            Some(max) => format!("{} to {}", self.experience_years.min, max),
            None => format!("{}+", self.experience_years.min),
        };

        let req = &self.education_required;
        let education = [
            ("required_degree", &req.required_degree),
            ("degree_restriction", &req.degree_restriction),
            ("required_field", &req.required_field),
        ]
        .iter()
        .filter_map(|(k, v)| {
            v.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{k}: {v}"))
        })
        .collect::<Vec<_>>()
        .join(", ");

        format!(
            "Job Title: {}\nIndustry: {}\nRequired Experience: {} years\nRequired Education: {}\nRequired Skills: {}\n\nJob Description:\n{}",
            self.title.trim(),
            self.company_industry.trim(),
            experience,
            education,
            self.skills_required.join(", "),
            self.description.trim()
        )
    }
}
