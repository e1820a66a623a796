// CV ingestion LLM prompt templates.

pub const CV_EXTRACT_SYSTEM: &str = "\
You are an expert CV/resume parser. \
Extract structured information from resumes. Be thorough but accurate. \
If information is not present, leave the field null or the list empty. \
You MUST respond with valid JSON only. No markdown fences, no explanations.";

pub const CV_EXTRACT_PROMPT: &str = r#"Extract information from this CV.

CV TEXT:
{cv_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "name": "string",
  "email": "string" | null,
  "phone": "string" | null,
  "location": {"city": "string" | null, "countryCode": "string" | null, "region": "string" | null} | null,
  "summary": "string" | null,
  "work": [
    {
      "company": "string",
      "position": "string",
      "startDate": "YYYY-MM-DD" | "YYYY-MM" | "YYYY",
      "endDate": "YYYY-MM-DD" | "YYYY-MM" | "YYYY" | "Present" | null,
      "summary": "string" | null,
      "highlights": ["string"]
    }
  ],
  "education": [
    {
      "institution": "string",
      "degree": "string" | null,
      "field": "string" | null,
      "startDate": "YYYY" | null,
      "endDate": "YYYY" | null,
      "gpa": "string" | null
    }
  ],
  "skills": ["string"],
  "languages": ["string"],
  "certifications": ["string"]
}

RULES:
1. List each skill once, as a short name ("Python", not "Expert in Python programming")
2. Use "Present" as endDate for the current position
3. Do NOT invent dates, employers, or degrees that the text does not state
4. Return ONLY the JSON object, nothing else."#;

pub const CV_CATEGORIZE_SYSTEM: &str = "\
You classify candidates into exactly one industry category. \
Respond with ONLY the category name, copied exactly from the list. No explanation.";

pub const CV_CATEGORIZE_PROMPT: &str = r#"Based on the following CV information, classify the candidate into ONE of these categories:
{categories}

CV SUMMARY:
- Skills: {skills}
- Work Experience: {work}

Consider the candidate's primary skills and technical expertise, their job titles, and their overall career focus.

Category:"#;
