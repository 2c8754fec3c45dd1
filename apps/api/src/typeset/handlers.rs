//! Axum route handlers for the render and session APIs.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::state::AppState;
use crate::template::{render_resume, FontSize, RenderOptions, TemplateStyle};
use crate::typeset::compiler::compile;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub session_id: String,
    pub resume: ResumeData,
    #[serde(default)]
    pub style: TemplateStyle,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default)]
    pub multi_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct RenderSourceRequest {
    pub session_id: String,
    pub latex_source: String,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub session_id: String,
    pub artifact_path: String,
    pub byte_size: u64,
    pub passes: u32,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Creates a session with a fresh short id. The working directory appears on
/// first render, not here.
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let session = state.sessions.create()?;
    let guard = session.lock().await;
    info!("Created session {}", guard.id);
    Ok(Json(CreateSessionResponse {
        session_id: guard.id.clone(),
        created_at: guard.created_at,
    }))
}

/// DELETE /api/v1/sessions/:id
///
/// Removes the session and its working directory, waiting out any in-flight
/// compile. Cleanup runs regardless of how previous compiles ended.
pub async fn handle_remove_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .sessions
        .remove(&session_id)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to remove session: {e}")))?;
    if !removed {
        return Err(AppError::NotFound(format!("Session {session_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/artifact
///
/// Serves the session's most recent compiled PDF for preview/download.
pub async fn handle_artifact_download(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state
        .sessions
        .peek(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    let guard = session.lock().await;
    let artifact = guard
        .last_artifact
        .as_ref()
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} has no compiled résumé yet")))?;

    let bytes = std::fs::read(&artifact.path).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "failed to read artifact {}: {e}",
            artifact.path.display()
        ))
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "inline; filename=\"resume.pdf\""),
        ],
        Bytes::from(bytes),
    ))
}

/// POST /api/v1/render
///
/// Full pipeline: validate + render the résumé data into LaTeX, then compile
/// it in the session's working directory. Render errors surface before any
/// process is spawned.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    let opts = RenderOptions {
        style: request.style,
        font_size: request.font_size,
        multi_page: request.multi_page,
    };
    let source = render_resume(&request.resume, &opts)?;
    compile_into_session(&state, &request.session_id, &source).await
}

/// POST /api/v1/render/source
///
/// Compiles caller-edited LaTeX directly, bypassing the template renderer.
/// This is the escape hatch for users who tweak the generated source by hand.
pub async fn handle_render_source(
    State(state): State<AppState>,
    Json(request): Json<RenderSourceRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    if request.latex_source.trim().is_empty() {
        return Err(AppError::Validation(
            "latex_source cannot be empty".to_string(),
        ));
    }
    compile_into_session(&state, &request.session_id, &request.latex_source).await
}

/// Shared tail of both render endpoints: lock the session, compile, record
/// the artifact on the session state.
async fn compile_into_session(
    state: &AppState,
    session_id: &str,
    source: &str,
) -> Result<Json<RenderResponse>, AppError> {
    let session = state.sessions.checkout(session_id)?;
    let mut guard = session.lock().await;

    let artifact = compile(source, &guard.dir, &state.compile).await?;

    guard.render_count += 1;
    guard.last_artifact = Some(artifact.clone());
    info!(
        "Session {}: render #{} -> {} ({} bytes, {} pass(es))",
        guard.id,
        guard.render_count,
        artifact.path.display(),
        artifact.byte_size,
        artifact.passes
    );

    Ok(Json(RenderResponse {
        session_id: guard.id.clone(),
        artifact_path: artifact.path.display().to_string(),
        byte_size: artifact.byte_size,
        passes: artifact.passes,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
