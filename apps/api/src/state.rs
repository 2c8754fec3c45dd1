use std::sync::Arc;

use crate::config::Config;
use crate::tailor::Tailor;
use crate::typeset::compiler::CompileOptions;
use crate::typeset::workspace::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration; compile settings are pre-extracted into
    /// `compile`, so handlers rarely touch this directly.
    #[allow(dead_code)]
    pub config: Config,
    /// Session id → working directory registry; per-session locks serialize
    /// compiles inside one session.
    pub sessions: Arc<SessionRegistry>,
    /// Engine, timeout, and pass budget for every compile job.
    pub compile: CompileOptions,
    /// AI tailoring backend. `None` when ANTHROPIC_API_KEY is unset; the
    /// tailoring endpoints then answer 422.
    pub tailor: Option<Arc<dyn Tailor>>,
}
