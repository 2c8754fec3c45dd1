pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::tailor::handlers as tailor;
use crate::typeset::handlers as typeset;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(typeset::handle_create_session))
        .route("/api/v1/sessions/:id", delete(typeset::handle_remove_session))
        .route(
            "/api/v1/sessions/:id/artifact",
            get(typeset::handle_artifact_download),
        )
        // Render pipeline
        .route("/api/v1/render", post(typeset::handle_render))
        .route("/api/v1/render/source", post(typeset::handle_render_source))
        // AI tailoring
        .route("/api/v1/tailor/summary", post(tailor::handle_tailor_summary))
        .route(
            "/api/v1/tailor/projects",
            post(tailor::handle_tailor_projects),
        )
        .with_state(state)
}
