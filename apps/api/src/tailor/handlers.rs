//! Axum route handlers for the Tailoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::resume::{ProjectEntry, ResumeData};
use crate::state::AppState;
use crate::tailor::{PostingAnalysis, Tailor, DEFAULT_MAX_PROJECTS};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TailorSummaryRequest {
    pub resume: ResumeData,
    pub posting: String,
}

#[derive(Debug, Serialize)]
pub struct TailorSummaryResponse {
    pub summary: String,
    pub analysis: PostingAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct TailorProjectsRequest {
    pub projects: Vec<ProjectEntry>,
    pub posting: String,
    #[serde(default)]
    pub max_projects: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TailorProjectsResponse {
    pub selected: Vec<ProjectEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

fn require_tailor(state: &AppState) -> Result<Arc<dyn Tailor>, AppError> {
    state
        .tailor
        .clone()
        .ok_or(AppError::TailoringUnavailable)
}

/// POST /api/v1/tailor/summary
///
/// Analyzes the posting and writes a summary grounded in the submitted
/// résumé data. The caller decides whether to adopt the result; it is just
/// another string field from the renderer's point of view.
pub async fn handle_tailor_summary(
    State(state): State<AppState>,
    Json(request): Json<TailorSummaryRequest>,
) -> Result<Json<TailorSummaryResponse>, AppError> {
    if request.posting.trim().is_empty() {
        return Err(AppError::Validation("posting cannot be empty".to_string()));
    }
    let tailor = require_tailor(&state)?;

    let analysis = tailor.analyze_posting(&request.posting).await?;
    let summary = tailor
        .tailor_summary(&request.resume, &request.posting)
        .await?;

    Ok(Json(TailorSummaryResponse { summary, analysis }))
}

/// POST /api/v1/tailor/projects
///
/// Picks the projects most relevant to the posting, capped at
/// `max_projects` (default 3).
pub async fn handle_tailor_projects(
    State(state): State<AppState>,
    Json(request): Json<TailorProjectsRequest>,
) -> Result<Json<TailorProjectsResponse>, AppError> {
    if request.posting.trim().is_empty() {
        return Err(AppError::Validation("posting cannot be empty".to_string()));
    }
    if request.projects.is_empty() {
        return Err(AppError::Validation(
            "projects cannot be empty".to_string(),
        ));
    }
    let tailor = require_tailor(&state)?;

    let max_projects = request.max_projects.unwrap_or(DEFAULT_MAX_PROJECTS).max(1);
    let selected = tailor
        .select_projects(&request.projects, &request.posting, max_projects)
        .await?;

    Ok(Json(TailorProjectsResponse { selected }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::typeset::compiler::CompileOptions;
    use crate::typeset::workspace::SessionRegistry;

    struct StubTailor;

    #[async_trait::async_trait]
    impl Tailor for StubTailor {
        async fn analyze_posting(&self, _posting: &str) -> Result<PostingAnalysis, AppError> {
            Ok(PostingAnalysis {
                title: Some("Senior Rust Engineer".to_string()),
                seniority: "senior".to_string(),
                required_skills: vec!["Rust".to_string()],
                preferred_skills: vec![],
                keywords: vec!["Rust".to_string()],
            })
        }

        async fn tailor_summary(
            &self,
            resume: &ResumeData,
            _posting: &str,
        ) -> Result<String, AppError> {
            Ok(format!("Summary for {}", resume.name))
        }

        async fn select_projects(
            &self,
            projects: &[ProjectEntry],
            _posting: &str,
            max_projects: usize,
        ) -> Result<Vec<ProjectEntry>, AppError> {
            Ok(projects.iter().take(max_projects).cloned().collect())
        }
    }

    fn make_state(tailor: Option<Arc<dyn Tailor>>) -> AppState {
        AppState {
            config: Config {
                port: 0,
                rust_log: "info".to_string(),
                anthropic_api_key: None,
                latex_bin: "pdflatex".to_string(),
                compile_timeout_secs: 30,
                max_passes: 2,
                workspace_root: None,
            },
            sessions: Arc::new(SessionRegistry::new(None).unwrap()),
            compile: CompileOptions::default(),
            tailor,
        }
    }

    fn make_resume() -> ResumeData {
        ResumeData {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            location: None,
            links: vec![],
            sections: vec![],
        }
    }

    #[tokio::test]
    async fn test_tailor_summary_handler_with_stub_backend() {
        let state = make_state(Some(Arc::new(StubTailor)));
        let request = TailorSummaryRequest {
            resume: make_resume(),
            posting: "We need a Rust engineer.".to_string(),
        };
        let response = handle_tailor_summary(axum::extract::State(state), Json(request))
            .await
            .unwrap();
        assert_eq!(response.0.summary, "Summary for Ada");
        assert_eq!(response.0.analysis.seniority, "senior");
    }

    #[tokio::test]
    async fn test_tailor_handlers_refuse_without_backend() {
        let state = make_state(None);
        let request = TailorSummaryRequest {
            resume: make_resume(),
            posting: "A posting".to_string(),
        };
        let result = handle_tailor_summary(axum::extract::State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::TailoringUnavailable)));
    }

    #[tokio::test]
    async fn test_tailor_summary_rejects_empty_posting() {
        let state = make_state(Some(Arc::new(StubTailor)));
        let request = TailorSummaryRequest {
            resume: make_resume(),
            posting: "   ".to_string(),
        };
        let result = handle_tailor_summary(axum::extract::State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_tailor_projects_handler_caps_selection() {
        let state = make_state(Some(Arc::new(StubTailor)));
        let projects: Vec<ProjectEntry> = (0..5)
            .map(|i| ProjectEntry {
                name: format!("p{i}"),
                description: "d".to_string(),
                technologies: vec![],
                link: None,
            })
            .collect();
        let request = TailorProjectsRequest {
            projects,
            posting: "Rust".to_string(),
            max_projects: Some(2),
        };
        let response = handle_tailor_projects(axum::extract::State(state), Json(request))
            .await
            .unwrap();
        assert_eq!(response.0.selected.len(), 2);
        assert_eq!(response.0.selected[0].name, "p0");
    }

    #[test]
    fn test_tailor_projects_request_defaults_max() {
        let json = serde_json::json!({
            "projects": [{"name": "loom", "description": "worker pool"}],
            "posting": "Rust engineer"
        });
        let request: TailorProjectsRequest = serde_json::from_value(json).unwrap();
        assert!(request.max_projects.is_none());
        assert_eq!(request.projects.len(), 1);
    }

    #[test]
    fn test_tailor_summary_request_parses() {
        let json = serde_json::json!({
            "resume": {
                "name": "Ada",
                "email": "ada@example.com",
                "sections": []
            },
            "posting": "We need a compiler engineer."
        });
        let request: TailorSummaryRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.resume.name, "Ada");
    }
}
