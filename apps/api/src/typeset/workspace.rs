//! Session workspace — one exclusively-owned working directory per session.
//!
//! The registry maps session ids to session state behind per-session async
//! mutexes: holding a session's lock is the mutual-exclusion token for
//! compiling in its directory, so two requests for the same session serialize
//! while different sessions proceed independently. The workspace root is
//! either a configured directory or a process-lifetime temp dir that is
//! removed when the process exits.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::typeset::compiler::Artifact;

/// Server-generated session ids are this many hex characters of a UUID.
const GENERATED_ID_LEN: usize = 8;

const MAX_SESSION_ID_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session id cannot be empty")]
    EmptyId,

    #[error("session id '{0}' may only contain letters, digits, '-' and '_' (max 64 chars)")]
    InvalidId(String),
}

/// Per-session state. The working directory is not created here — the
/// compiler creates it on the first pass, so a session that never compiles
/// leaves nothing on disk.
#[derive(Debug)]
pub struct SessionState {
    pub id: String,
    pub dir: PathBuf,
    pub created_at: DateTime<Utc>,
    pub render_count: u32,
    pub last_artifact: Option<Artifact>,
}

impl SessionState {
    fn new(id: &str, root: &Path) -> Self {
        SessionState {
            id: id.to_string(),
            dir: root.join(id),
            created_at: Utc::now(),
            render_count: 0,
            last_artifact: None,
        }
    }
}

enum WorkspaceRoot {
    /// Operator-provided directory; survives process exit.
    Configured(PathBuf),
    /// Default: a temp dir owned by the registry, removed on drop.
    Ephemeral(TempDir),
}

impl WorkspaceRoot {
    fn path(&self) -> &Path {
        match self {
            WorkspaceRoot::Configured(path) => path,
            WorkspaceRoot::Ephemeral(dir) => dir.path(),
        }
    }
}

pub struct SessionRegistry {
    root: WorkspaceRoot,
    sessions: StdMutex<HashMap<String, Arc<Mutex<SessionState>>>>,
}

impl SessionRegistry {
    pub fn new(configured_root: Option<PathBuf>) -> Result<Self> {
        let root = match configured_root {
            Some(path) => {
                std::fs::create_dir_all(&path).with_context(|| {
                    format!("failed to create workspace root {}", path.display())
                })?;
                let path = path
                    .canonicalize()
                    .with_context(|| format!("failed to resolve workspace root {}", path.display()))?;
                WorkspaceRoot::Configured(path)
            }
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("vitae-sessions-")
                    .tempdir()
                    .context("failed to create ephemeral workspace root")?;
                WorkspaceRoot::Ephemeral(dir)
            }
        };
        Ok(SessionRegistry {
            root,
            sessions: StdMutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Creates a session with a fresh short id.
    pub fn create(&self) -> Result<Arc<Mutex<SessionState>>, SessionError> {
        let id: String = Uuid::new_v4().simple().to_string()[..GENERATED_ID_LEN].to_string();
        self.checkout(&id)
    }

    /// Fetches the session for `id`, registering it on first use. The
    /// returned handle's lock guards all filesystem work in the session's
    /// directory.
    pub fn checkout(&self, id: &str) -> Result<Arc<Mutex<SessionState>>, SessionError> {
        validate_session_id(id)?;
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        let entry = sessions
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SessionState::new(id, self.root.path()))));
        Ok(Arc::clone(entry))
    }

    /// Fetches an existing session without registering a new one.
    pub fn peek(&self, id: &str) -> Option<Arc<Mutex<SessionState>>> {
        let sessions = self.sessions.lock().expect("session map poisoned");
        sessions.get(id).map(Arc::clone)
    }

    /// Removes a session and deletes its working directory. Waits for any
    /// in-flight compile to finish first, so the directory is never deleted
    /// under a running engine. Returns false for unknown sessions.
    pub async fn remove(&self, id: &str) -> std::io::Result<bool> {
        let entry = {
            let mut sessions = self.sessions.lock().expect("session map poisoned");
            sessions.remove(id)
        };
        let Some(entry) = entry else {
            return Ok(false);
        };
        let state = entry.lock().await;
        if state.dir.exists() {
            std::fs::remove_dir_all(&state.dir)?;
        }
        info!("Removed session {} ({})", state.id, state.dir.display());
        Ok(true)
    }
}

fn validate_session_id(id: &str) -> Result<(), SessionError> {
    if id.is_empty() {
        return Err(SessionError::EmptyId);
    }
    let acceptable = id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !acceptable {
        return Err(SessionError::InvalidId(id.to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
