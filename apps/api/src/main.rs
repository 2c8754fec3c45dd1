mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod tailor;
mod template;
mod typeset;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailor::{LlmTailor, Tailor};
use crate::typeset::compiler::CompileOptions;
use crate::typeset::workspace::SessionRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (defaults cover everything but the LLM key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Session workspace (ephemeral temp root unless WORKSPACE_ROOT is set)
    let sessions = Arc::new(SessionRegistry::new(config.workspace_root.clone())?);
    info!("Session workspace root: {}", sessions.root().display());

    // TeX engine options; report discoverability early rather than on the
    // first render, but keep serving either way.
    let compile = CompileOptions::from_config(&config);
    match which::which(&compile.engine) {
        Ok(path) => info!("TeX engine: {}", path.display()),
        Err(_) => warn!(
            "TeX engine '{}' not found on PATH; renders will fail with tool_missing until it is installed",
            compile.engine
        ),
    }

    // AI tailoring (optional)
    let tailor: Option<Arc<dyn Tailor>> = match &config.anthropic_api_key {
        Some(key) => {
            info!("AI tailoring enabled (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmTailor::new(LlmClient::new(key.clone()))))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; AI tailoring disabled");
            None
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        sessions,
        compile,
        tailor,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
