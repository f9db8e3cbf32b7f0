//! Typed errors for definition loading.

use std::fmt;
use std::path::PathBuf;

use pgweave_core::MergeError;
use thiserror::Error;

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// One problem tied to one definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiagnostic {
    /// The file the problem was found in.
    pub path: PathBuf,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for FileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Typed error for definition file operations.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure outside of definition files
    /// (e.g. a malformed generation config).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid or missing input (e.g. non-existent directory).
    #[error("{0}")]
    InvalidInput(String),

    /// One or more definition files failed to parse or validate.
    ///
    /// Every file is checked before this is raised, so the diagnostics
    /// cover the whole input set.
    #[error("{}", render_diagnostics(.0))]
    InvalidDefinitions(Vec<FileDiagnostic>),

    /// Duplicate qualified names across the merged definition files.
    #[error("{}", render_merge_errors(.0))]
    Merge(Vec<MergeError>),
}

fn render_diagnostics(diagnostics: &[FileDiagnostic]) -> String {
    let lines: Vec<String> = diagnostics.iter().map(FileDiagnostic::to_string).collect();
    format!(
        "{} definition file error(s):\n{}",
        diagnostics.len(),
        lines.join("\n")
    )
}

fn render_merge_errors(errors: &[MergeError]) -> String {
    let lines: Vec<String> = errors.iter().map(MergeError::to_string).collect();
    format!("{} merge error(s):\n{}", errors.len(), lines.join("\n"))
}
