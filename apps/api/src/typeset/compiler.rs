//! Compiler invoker — drives the external TeX engine over a session directory.
//!
//! One `compile` call is a small state machine:
//!
//! ```text
//! Init → Writing → Invoking → (Done | Retryable → Invoking | Fatal)
//! ```
//!
//! `Retryable` covers both reasons to invoke again: the log requested another
//! pass (forward references) or the run failed with a transient signature
//! (aux-file contention). The loop re-enters `Invoking` while passes remain
//! and otherwise forces `Fatal` with `MaxPassesExceeded`. Retryability is an
//! explicit branch on the classified outcome — a syntax error is fatal on the
//! first pass, never looped.
//!
//! Every pass overwrites its outputs (source, console log, PDF), so a retry
//! can never observe a half-written file from the previous attempt.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::typeset::log_parser::{
    classify_exhausted, classify_failed_run, is_transient_failure, needs_rerun, CompileFailure,
};

/// Fixed base filename stem: everything in a session directory hangs off it.
pub const SOURCE_FILE: &str = "resume.tex";
pub const ARTIFACT_FILE: &str = "resume.pdf";
pub const ENGINE_LOG_FILE: &str = "resume.log";
pub const CONSOLE_LOG_FILE: &str = "resume.out";

pub const DEFAULT_ENGINE: &str = "pdflatex";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Two passes resolve every forward reference our templates can produce.
pub const DEFAULT_MAX_PASSES: u32 = 2;

// ────────────────────────────────────────────────────────────────────────────
// Options and results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Engine binary name or path, resolved against PATH per pass.
    pub engine: String,
    /// Wall-clock bound for a single engine invocation.
    pub timeout: Duration,
    /// Upper bound on engine invocations for one job, reruns and transient
    /// retries included.
    pub max_passes: u32,
}

impl CompileOptions {
    pub fn from_config(config: &Config) -> Self {
        CompileOptions {
            engine: config.latex_bin.clone(),
            timeout: Duration::from_secs(config.compile_timeout_secs),
            max_passes: config.max_passes,
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            engine: DEFAULT_ENGINE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

/// A successful compilation: the PDF on disk and how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub byte_size: u64,
    pub passes: u32,
}

/// Errors out of `compile`. Engine-level failures carry a full diagnostic;
/// `Workspace` is for filesystem trouble around the invocation (treated as an
/// internal error upstream, not shown as a compile diagnostic).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Failed(#[from] CompileFailure),

    #[error("workspace io error: {0}")]
    Workspace(#[from] std::io::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum CompileState {
    Init,
    Writing,
    Invoking { pass: u32 },
    Retryable { pass: u32 },
    Done(Artifact),
    Fatal(CompileFailure),
}

/// Compiles `source` inside `workdir`, invoking the engine up to
/// `opts.max_passes` times. The caller must hold the session's lock for the
/// whole call; nothing outside `workdir` is written.
pub async fn compile(
    source: &str,
    workdir: &Path,
    opts: &CompileOptions,
) -> Result<Artifact, CompileError> {
    let mut state = CompileState::Init;
    loop {
        state = match state {
            CompileState::Init => {
                std::fs::create_dir_all(workdir)?;
                CompileState::Writing
            }

            CompileState::Writing => {
                std::fs::write(workdir.join(SOURCE_FILE), source)?;
                CompileState::Invoking { pass: 1 }
            }

            CompileState::Invoking { pass } => run_pass(workdir, opts, pass).await?,

            CompileState::Retryable { pass } if pass < opts.max_passes => {
                debug!("pass {pass} requested another pass");
                CompileState::Invoking { pass: pass + 1 }
            }

            CompileState::Retryable { pass } => {
                let (log, log_path) = read_run_log(workdir);
                warn!("giving up after {pass} passes without converging");
                CompileState::Fatal(classify_exhausted(&log, log_path))
            }

            CompileState::Done(artifact) => {
                info!(
                    "Compiled {} ({} bytes, {} pass(es))",
                    artifact.path.display(),
                    artifact.byte_size,
                    artifact.passes
                );
                return Ok(artifact);
            }

            CompileState::Fatal(failure) => {
                warn!("compilation failed: {failure}");
                return Err(CompileError::Failed(failure));
            }
        };
    }
}

/// One engine invocation. Returns the next state: `Done`, `Retryable`, or
/// `Fatal` — filesystem errors around the spawn are the only hard errors.
async fn run_pass(
    workdir: &Path,
    opts: &CompileOptions,
    pass: u32,
) -> Result<CompileState, CompileError> {
    // Resolve before spawning so a missing engine is reported as a diagnostic
    // with no side effects beyond the already-written source file.
    let engine = match which::which(&opts.engine) {
        Ok(path) => path,
        Err(_) => return Ok(CompileState::Fatal(CompileFailure::tool_missing(&opts.engine))),
    };

    debug!(
        "pass {pass}: {} -interaction=nonstopmode in {}",
        engine.display(),
        workdir.display()
    );

    let console = File::create(workdir.join(CONSOLE_LOG_FILE))?;
    let console_err = console.try_clone()?;

    let spawned = Command::new(&engine)
        .arg("-interaction=nonstopmode")
        .arg("-halt-on-error")
        .arg(SOURCE_FILE)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(console))
        .stderr(Stdio::from(console_err))
        .kill_on_drop(true)
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(CompileState::Fatal(CompileFailure::tool_missing(
                &opts.engine,
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let status = match timeout(opts.timeout, child.wait()).await {
        Ok(status) => status?,
        Err(_elapsed) => {
            child.start_kill().ok();
            let _ = child.wait().await;
            return Ok(CompileState::Fatal(CompileFailure::timeout(
                opts.timeout,
                existing_log_path(workdir),
            )));
        }
    };

    let (log, log_path) = read_run_log(workdir);

    if !status.success() {
        if is_transient_failure(&log) {
            warn!("pass {pass}: transient engine failure");
            return Ok(CompileState::Retryable { pass });
        }
        return Ok(CompileState::Fatal(classify_failed_run(&log, log_path)));
    }

    let artifact_path = workdir.join(ARTIFACT_FILE);
    let byte_size = match std::fs::metadata(&artifact_path) {
        Ok(meta) if meta.len() > 0 => meta.len(),
        _ => return Ok(CompileState::Fatal(CompileFailure::empty_output(log_path))),
    };

    if needs_rerun(&log) {
        return Ok(CompileState::Retryable { pass });
    }

    Ok(CompileState::Done(Artifact {
        path: artifact_path,
        byte_size,
        passes: pass,
    }))
}

/// Reads the most useful log for the run just finished: the engine's own log
/// file when it wrote one, else the captured console output.
fn read_run_log(workdir: &Path) -> (String, Option<PathBuf>) {
    for name in [ENGINE_LOG_FILE, CONSOLE_LOG_FILE] {
        let path = workdir.join(name);
        if let Ok(bytes) = std::fs::read(&path) {
            if !bytes.is_empty() {
                return (String::from_utf8_lossy(&bytes).into_owned(), Some(path));
            }
        }
    }
    (String::new(), None)
}

fn existing_log_path(workdir: &Path) -> Option<PathBuf> {
    [ENGINE_LOG_FILE, CONSOLE_LOG_FILE]
        .iter()
        .map(|name| workdir.join(name))
        .find(|path| path.exists())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
