//! Diagnostics and pipeline errors.
//!
//! The loader collects every violation it finds into a [`Report`] instead
//! of stopping at the first one. [`PlanError`] is the pipeline-level error;
//! each kind maps to the process exit code the CLI contract promises.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Diagnostic severity. Warnings are surfaced but never fail a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single structured diagnostic tied to an input file.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        write!(f, "{} {}: {}", tag, self.file, self.message)
    }
}

/// An aggregated validation report from one loader pass.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, file: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            file: file.to_string(),
            message: message.into(),
        });
    }

    pub fn warning(&mut self, file: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            file: file.to_string(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors().count())
    }
}

/// Pipeline-level error. No constraint is relaxed, no default substituted,
/// no partial plan emitted: every kind terminates the run.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("{0}")]
    Validation(Report),

    #[error("no feasible assignment exists under the applied constraints: {applied}")]
    Infeasible { applied: String },

    #[error("solver exceeded the {limit_secs}s wall-clock bound")]
    Timeout { limit_secs: u64 },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl PlanError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Infeasible { .. } => 3,
            Self::Timeout { .. } => 4,
            Self::Io { .. } | Self::Serialize { .. } => 1,
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
