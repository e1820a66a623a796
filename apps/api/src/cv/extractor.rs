use tracing::{info, warn};

use crate::cv::prompts::{
    CV_CATEGORIZE_PROMPT, CV_CATEGORIZE_SYSTEM, CV_EXTRACT_PROMPT, CV_EXTRACT_SYSTEM,
};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::cv::{CvData, WorkExperience};

/// Industry categories a CV can be filed under. Jobs are matched to CVs whose
/// category equals the job's `company_industry`.
pub const CV_CATEGORIES: [&str; 14] = [
    "Software Engineering",
    "Data Science & AI",
    "Product Management",
    "Design & UX",
    "Marketing & Sales",
    "Finance & Accounting",
    "Human Resources",
    "Customer Support",
    "Operations & Logistics",
    "Healthcare & Medical",
    "Education & Training",
    "Legal & Compliance",
    "Research & Development",
    "Other",
];

pub const FALLBACK_CATEGORY: &str = "Other";

/// Skills included in the categorization prompt.
const CATEGORIZE_SKILL_LIMIT: usize = 10;

/// Structures raw CV text into `CvData`.
pub async fn extract_cv_data(llm: &LlmClient, cv_text: &str) -> Result<CvData, LlmError> {
    let prompt = CV_EXTRACT_PROMPT.replace("{cv_text}", cv_text);
    let mut data: CvData = llm.call_json(&prompt, CV_EXTRACT_SYSTEM).await?;

    data.skills = dedup_skills(data.skills);
    info!(
        "Extracted CV for '{}': {} jobs, {} education records, {} skills",
        data.name,
        data.work.len(),
        data.education.len(),
        data.skills.len()
    );
    Ok(data)
}

/// Files the CV under one of `CV_CATEGORIES`. Never fails: LLM errors and
/// answers outside the list fall back to `"Other"`.
pub async fn categorize_cv(llm: &LlmClient, data: &CvData) -> &'static str {
    let prompt = build_categorize_prompt(data);

    match llm.call_text(&prompt, CV_CATEGORIZE_SYSTEM).await {
        Ok(answer) => {
            let category = normalize_category(&answer);
            if category == FALLBACK_CATEGORY && !answer.trim().eq_ignore_ascii_case("other") {
                warn!("LLM returned unknown category '{}', using '{FALLBACK_CATEGORY}'", answer.trim());
            }
            category
        }
        Err(e) => {
            warn!("CV categorization failed, using '{FALLBACK_CATEGORY}': {e}");
            FALLBACK_CATEGORY
        }
    }
}

/// Maps a free-form LLM answer onto the category list, tolerating case,
/// surrounding quotes, and a trailing period.
pub fn normalize_category(answer: &str) -> &'static str {
    let cleaned = answer
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim_end_matches('.')
        .trim();

    CV_CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(cleaned))
        .copied()
        .unwrap_or(FALLBACK_CATEGORY)
}

fn build_categorize_prompt(data: &CvData) -> String {
    let categories = CV_CATEGORIES
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    let skills = data
        .skills
        .iter()
        .take(CATEGORIZE_SKILL_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let work = data
        .work
        .iter()
        .map(describe_role)
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    CV_CATEGORIZE_PROMPT
        .replace("{categories}", &categories)
        .replace("{skills}", &skills)
        .replace("{work}", &work)
}

fn describe_role(work: &WorkExperience) -> String {
    match (work.position.as_deref(), work.company.as_deref()) {
        (Some(position), Some(company)) => format!("{position} at {company}"),
        (Some(position), None) => position.to_string(),
        (None, Some(company)) => company.to_string(),
        (None, None) => String::new(),
    }
}

/// Trims skills and drops blanks and case-insensitive duplicates, keeping the
/// first spelling.
fn dedup_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}
