//! AI tailoring — adapts résumé content to a specific job posting.
//!
//! Trait-based like the fit-scoring seam this grew out of: `AppState` holds
//! an `Option<Arc<dyn Tailor>>`, `LlmTailor` is the real backend, and tests
//! swap in a canned implementation. Tailored text is ordinary untrusted
//! input — it flows through the same LaTeX escaping as hand-typed fields.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::{ProjectEntry, ResumeData};
use crate::tailor::prompts::{
    ANALYZE_POSTING_PROMPT, SELECT_PROJECTS_PROMPT, SUMMARY_PROMPT, TAILOR_SYSTEM,
};

/// Default cap on projects kept after selection.
pub const DEFAULT_MAX_PROJECTS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Structured read of a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingAnalysis {
    pub title: Option<String>,
    pub seniority: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct SelectionPayload {
    selected_indices: Vec<usize>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The tailoring backend. Implement to swap the AI provider (or stub it in
/// tests) without touching handlers.
#[async_trait]
pub trait Tailor: Send + Sync {
    async fn analyze_posting(&self, posting: &str) -> Result<PostingAnalysis, AppError>;

    async fn tailor_summary(
        &self,
        resume: &ResumeData,
        posting: &str,
    ) -> Result<String, AppError>;

    async fn select_projects(
        &self,
        projects: &[ProjectEntry],
        posting: &str,
        max_projects: usize,
    ) -> Result<Vec<ProjectEntry>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmTailor — the Claude-backed implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmTailor {
    llm: LlmClient,
}

impl LlmTailor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Tailor for LlmTailor {
    async fn analyze_posting(&self, posting: &str) -> Result<PostingAnalysis, AppError> {
        let prompt = ANALYZE_POSTING_PROMPT.replace("{posting}", posting);
        self.llm
            .call_json::<PostingAnalysis>(&prompt, TAILOR_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("posting analysis failed: {e}")))
    }

    async fn tailor_summary(
        &self,
        resume: &ResumeData,
        posting: &str,
    ) -> Result<String, AppError> {
        let prompt = SUMMARY_PROMPT
            .replace("{resume_json}", &resume_digest(resume)?)
            .replace("{posting}", posting);
        let payload: SummaryPayload = self
            .llm
            .call_json(&prompt, TAILOR_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("summary generation failed: {e}")))?;

        let summary = payload.summary.trim().to_string();
        if summary.is_empty() {
            return Err(AppError::Llm(
                "summary generation returned empty text".to_string(),
            ));
        }
        Ok(summary)
    }

    async fn select_projects(
        &self,
        projects: &[ProjectEntry],
        posting: &str,
        max_projects: usize,
    ) -> Result<Vec<ProjectEntry>, AppError> {
        if projects.is_empty() {
            return Ok(vec![]);
        }

        let prompt = SELECT_PROJECTS_PROMPT
            .replace("{projects_json}", &projects_digest(projects)?)
            .replace("{posting}", posting)
            .replace("{max_projects}", &max_projects.to_string());
        let payload: SelectionPayload = self
            .llm
            .call_json(&prompt, TAILOR_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("project selection failed: {e}")))?;

        let selected = apply_selection(projects, &payload.selected_indices, max_projects);
        if selected.is_empty() {
            // Model returned nothing usable; keep the first few rather than
            // dropping the whole section.
            warn!(
                "project selection returned no valid indices ({:?}), keeping first {}",
                payload.selected_indices, max_projects
            );
            return Ok(projects.iter().take(max_projects).cloned().collect());
        }
        Ok(selected)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pure helpers
// ────────────────────────────────────────────────────────────────────────────

/// Applies a model-proposed index selection: keeps in-range indices, drops
/// duplicates, preserves the proposed order, caps at `max_projects`.
pub fn apply_selection(
    projects: &[ProjectEntry],
    indices: &[usize],
    max_projects: usize,
) -> Vec<ProjectEntry> {
    let mut seen = vec![false; projects.len()];
    let mut selected = Vec::new();
    for &index in indices {
        if index >= projects.len() || seen[index] {
            continue;
        }
        seen[index] = true;
        selected.push(projects[index].clone());
        if selected.len() == max_projects {
            break;
        }
    }
    selected
}

/// Candidate data sent to the model for summary writing: name and sections,
/// not the contact details.
fn resume_digest(resume: &ResumeData) -> Result<String, AppError> {
    serde_json::to_string_pretty(&serde_json::json!({
        "name": resume.name,
        "sections": resume.sections,
    }))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize resume digest: {e}")))
}

fn projects_digest(projects: &[ProjectEntry]) -> Result<String, AppError> {
    let listed: Vec<serde_json::Value> = projects
        .iter()
        .enumerate()
        .map(|(index, project)| {
            serde_json::json!({
                "index": index,
                "name": project.name,
                "description": project.description,
                "technologies": project.technologies,
            })
        })
        .collect();
    serde_json::to_string_pretty(&listed)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize projects: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
