//! Compile log reporter — classifies engine failures and extracts diagnostics.
//!
//! TeX engines report errors on lines starting with `!` and bury the useful
//! context in the lines that follow. The reporter finds the first marker,
//! captures it with a few trailing lines as the excerpt, and decides whether
//! a failed run looks transient (worth one more pass) or fatal. Everything
//! here is total: classification always produces a value, never an error.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Lines following the first `!` marker included in the excerpt.
pub const EXCERPT_CONTEXT_LINES: usize = 5;

/// Log signatures that mean "run the engine again": unresolved forward
/// references that a further pass over the fresh aux files will fix.
const RERUN_MARKERS: &[&str] = &[
    "Rerun to get cross-references right",
    "Label(s) may have changed",
    "There were undefined references",
];

/// Log signatures of transient failures — aux-file contention or a truncated
/// aux from an interrupted earlier pass. These are the only failed runs worth
/// retrying; anything else is treated as a source error and reported at once.
const TRANSIENT_MARKERS: &[&str] = &["I can't write on file", "Unable to read an entire line"];

// ────────────────────────────────────────────────────────────────────────────
// Failure taxonomy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ToolMissing,
    SyntaxError,
    Timeout,
    EmptyOutput,
    MaxPassesExceeded,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FailureKind::ToolMissing => "TeX engine not found on PATH",
            FailureKind::SyntaxError => "LaTeX source failed to compile",
            FailureKind::Timeout => "TeX engine timed out",
            FailureKind::EmptyOutput => "TeX engine produced no output PDF",
            FailureKind::MaxPassesExceeded => {
                "compilation did not converge within the allowed passes"
            }
        };
        f.write_str(msg)
    }
}

/// Structured diagnostic for a failed compilation: the kind, a short excerpt
/// a user can read without opening the log, and where the raw log lives.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{kind}")]
pub struct CompileFailure {
    pub kind: FailureKind,
    pub excerpt: Option<String>,
    pub log_path: Option<PathBuf>,
}

impl CompileFailure {
    pub fn tool_missing(engine: &str) -> Self {
        CompileFailure {
            kind: FailureKind::ToolMissing,
            excerpt: Some(format!("'{engine}' was not found on PATH")),
            log_path: None,
        }
    }

    pub fn timeout(limit: Duration, log_path: Option<PathBuf>) -> Self {
        CompileFailure {
            kind: FailureKind::Timeout,
            excerpt: Some(format!(
                "engine produced no result within {}s and was killed",
                limit.as_secs()
            )),
            log_path,
        }
    }

    pub fn empty_output(log_path: Option<PathBuf>) -> Self {
        CompileFailure {
            kind: FailureKind::EmptyOutput,
            excerpt: Some("engine exited cleanly but wrote no usable PDF".to_string()),
            log_path,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Log scanning
// ────────────────────────────────────────────────────────────────────────────

/// First `!`-marked error line plus up to [`EXCERPT_CONTEXT_LINES`] following
/// lines, or `None` when the log carries no error marker.
pub fn first_error_excerpt(log: &str) -> Option<String> {
    let lines: Vec<&str> = log.lines().collect();
    let start = lines.iter().position(|line| line.starts_with('!'))?;
    let end = (start + 1 + EXCERPT_CONTEXT_LINES).min(lines.len());
    Some(lines[start..end].join("\n"))
}

/// True when the log asks for another pass to resolve forward references.
pub fn needs_rerun(log: &str) -> bool {
    RERUN_MARKERS.iter().any(|marker| log.contains(marker))
}

/// True when a failed run matches a known transient signature.
pub fn is_transient_failure(log: &str) -> bool {
    TRANSIENT_MARKERS.iter().any(|marker| log.contains(marker))
}

/// Classifies a non-transient failed run as a syntax error, with the best
/// excerpt available — the marked error, or the tail of the log when the
/// engine died without one.
pub fn classify_failed_run(log: &str, log_path: Option<PathBuf>) -> CompileFailure {
    CompileFailure {
        kind: FailureKind::SyntaxError,
        excerpt: first_error_excerpt(log).or_else(|| log_tail(log, EXCERPT_CONTEXT_LINES)),
        log_path,
    }
}

/// Classifies a job that used up its pass budget without converging. The
/// excerpt is the rerun/transient line that kept the loop going.
pub fn classify_exhausted(log: &str, log_path: Option<PathBuf>) -> CompileFailure {
    let excerpt = log
        .lines()
        .find(|line| {
            RERUN_MARKERS
                .iter()
                .chain(TRANSIENT_MARKERS)
                .any(|marker| line.contains(marker))
        })
        .map(str::to_string)
        .or_else(|| first_error_excerpt(log));
    CompileFailure {
        kind: FailureKind::MaxPassesExceeded,
        excerpt,
        log_path,
    }
}

fn log_tail(log: &str, lines: usize) -> Option<String> {
    let kept: Vec<&str> = log
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if kept.is_empty() {
        return None;
    }
    let start = kept.len().saturating_sub(lines);
    Some(kept[start..].join("\n"))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SYNTAX_ERROR_LOG: &str = "\
This is pdfTeX, Version 3.141592653
(./resume.tex
LaTeX2e <2023-11-01>
! Undefined control sequence.
l.12 \\badmacro
               {Senior Engineer}
The control sequence at the end of the top line
of your error message was never \\def'ed.
Type  H <return>  for immediate help.
 ...
";

    #[test]
    fn test_first_error_excerpt_captures_marker_and_context() {
        let excerpt = first_error_excerpt(SYNTAX_ERROR_LOG).unwrap();
        let lines: Vec<&str> = excerpt.lines().collect();
        assert_eq!(lines[0], "! Undefined control sequence.");
        assert_eq!(lines.len(), 1 + EXCERPT_CONTEXT_LINES);
        assert!(excerpt.contains("l.12"));
    }

    #[test]
    fn test_first_error_excerpt_short_log_does_not_overrun() {
        let log = "! Missing $ inserted.\nl.3 x_y\n";
        let excerpt = first_error_excerpt(log).unwrap();
        assert_eq!(excerpt, "! Missing $ inserted.\nl.3 x_y");
    }

    #[test]
    fn test_first_error_excerpt_none_without_marker() {
        assert!(first_error_excerpt("all fine\nOutput written on resume.pdf\n").is_none());
        assert!(first_error_excerpt("").is_none());
    }

    #[test]
    fn test_needs_rerun_detects_all_markers() {
        assert!(needs_rerun(
            "LaTeX Warning: Label(s) may have changed. Rerun to get cross-references right.\n"
        ));
        assert!(needs_rerun("LaTeX Warning: There were undefined references.\n"));
        assert!(!needs_rerun("Output written on resume.pdf (1 page).\n"));
    }

    #[test]
    fn test_is_transient_failure_detects_aux_contention() {
        assert!(is_transient_failure(
            "! I can't write on file `resume.aux'.\n"
        ));
        assert!(is_transient_failure(
            "! Unable to read an entire line---bufsize=200000.\n"
        ));
        assert!(!is_transient_failure(SYNTAX_ERROR_LOG));
    }

    #[test]
    fn test_classify_failed_run_is_syntax_error_with_excerpt() {
        let failure = classify_failed_run(SYNTAX_ERROR_LOG, Some(PathBuf::from("/w/resume.log")));
        assert_eq!(failure.kind, FailureKind::SyntaxError);
        assert!(failure.excerpt.unwrap().contains("! Undefined control sequence."));
        assert_eq!(failure.log_path.as_deref(), Some(std::path::Path::new("/w/resume.log")));
    }

    #[test]
    fn test_classify_failed_run_falls_back_to_log_tail() {
        let log = "line one\n\nline two\nfatal: engine aborted\n";
        let failure = classify_failed_run(log, None);
        assert_eq!(failure.kind, FailureKind::SyntaxError);
        let excerpt = failure.excerpt.unwrap();
        assert!(excerpt.contains("fatal: engine aborted"));
        assert!(!excerpt.contains("\n\n"));
    }

    #[test]
    fn test_classify_exhausted_quotes_the_rerun_line() {
        let log = "pass ok\nLaTeX Warning: There were undefined references.\n";
        let failure = classify_exhausted(log, None);
        assert_eq!(failure.kind, FailureKind::MaxPassesExceeded);
        assert!(failure
            .excerpt
            .unwrap()
            .contains("There were undefined references"));
    }

    #[test]
    fn test_constructors_fill_kind_and_excerpt() {
        let missing = CompileFailure::tool_missing("pdflatex");
        assert_eq!(missing.kind, FailureKind::ToolMissing);
        assert!(missing.excerpt.unwrap().contains("pdflatex"));

        let timed_out = CompileFailure::timeout(Duration::from_secs(30), None);
        assert_eq!(timed_out.kind, FailureKind::Timeout);
        assert!(timed_out.excerpt.unwrap().contains("30s"));

        let empty = CompileFailure::empty_output(None);
        assert_eq!(empty.kind, FailureKind::EmptyOutput);
    }

    #[test]
    fn test_failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::MaxPassesExceeded).unwrap();
        assert_eq!(json, "\"max_passes_exceeded\"");
    }
}
