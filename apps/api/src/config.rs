use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables. Everything
/// has a default except the Anthropic key, which is genuinely optional:
/// without it the service runs with AI tailoring disabled.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Enables the tailoring endpoints when set.
    pub anthropic_api_key: Option<String>,
    /// TeX engine binary name or path, resolved against PATH.
    pub latex_bin: String,
    /// Wall-clock bound for one engine invocation.
    pub compile_timeout_secs: u64,
    /// Engine invocations allowed per compile job (reruns included).
    pub max_passes: u32,
    /// Session workspace root. Defaults to a process-lifetime temp dir that
    /// is removed on exit.
    pub workspace_root: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_or("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            latex_bin: env_or("LATEX_BIN", crate::typeset::compiler::DEFAULT_ENGINE),
            compile_timeout_secs: parse_or(
                "COMPILE_TIMEOUT_SECS",
                crate::typeset::compiler::DEFAULT_TIMEOUT_SECS,
            )?,
            max_passes: parse_or("MAX_PASSES", crate::typeset::compiler::DEFAULT_MAX_PASSES)?,
            workspace_root: optional_env("WORKSPACE_ROOT").map(PathBuf::from),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Like `env_or` but distinguishes "unset or blank" from a real value.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
