// All LLM prompt constants for the tailoring module. Templates carry
// {placeholder} markers that the caller fills with serialized context before
// sending.

/// System prompt shared by every tailoring call — enforces JSON-only output.
pub const TAILOR_SYSTEM: &str = "You are a resume strategist helping a candidate \
    target a specific job posting. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Posting analysis. Replace `{posting}` before sending.
pub const ANALYZE_POSTING_PROMPT: &str = r#"Analyze the following job posting.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Senior Rust Engineer",
  "seniority": "senior",
  "required_skills": ["Rust", "distributed systems"],
  "preferred_skills": ["Kubernetes"],
  "keywords": ["Rust", "latency", "reliability"]
}

Rules:
- "title" is the role title, or null when the posting does not state one.
- "seniority" is one of: "junior", "mid", "senior", "staff", "unknown".
- "required_skills" are explicit must-haves ("required", "must have", minimum years).
- "preferred_skills" are nice-to-haves ("preferred", "bonus", "a plus").
- "keywords" are the 10-20 most load-bearing terms, most important first.

Job posting:
{posting}
"#;

/// Summary generation. Replace `{resume_json}` and `{posting}` before sending.
pub const SUMMARY_PROMPT: &str = r#"Write a professional summary for the candidate below,
tailored to the job posting.

Return a JSON object with this EXACT schema:
{
  "summary": "Two to three sentences."
}

Rules:
- 2-3 sentences, third person implied (no "I").
- Use only facts present in the candidate data. Do NOT invent employers,
  years of experience, technologies, or outcomes.
- Weave in the posting's vocabulary where the candidate data genuinely
  supports it; skip keywords the data cannot back up.

Candidate data:
{resume_json}

Job posting:
{posting}
"#;

/// Project selection. Replace `{projects_json}`, `{posting}` and `{max_projects}`.
pub const SELECT_PROJECTS_PROMPT: &str = r#"Pick the projects most relevant to the job posting.

The projects are listed with zero-based indices. Return a JSON object with
this EXACT schema:
{
  "selected_indices": [2, 0]
}

Rules:
- At most {max_projects} indices, most relevant first.
- Only indices from the list below; never invent indices.
- Prefer projects whose technologies and outcomes overlap the posting.

Projects:
{projects_json}

Job posting:
{posting}
"#;
