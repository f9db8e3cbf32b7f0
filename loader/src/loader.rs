//! Definition file discovery, parallel parsing, and registry loading.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use pgweave_core::{Registry, SchemaCollection, validate_collection};
use tracing::{debug, info};

use crate::error::{FileDiagnostic, LoaderError, Result};

/// Counts of what one load run brought into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Definition files parsed.
    pub files: usize,
    /// Enumerated types registered.
    pub enums: usize,
    /// Composite types registered.
    pub composites: usize,
    /// Tables registered.
    pub tables: usize,
    /// Distinct schema names inferred.
    pub schemas: usize,
}

/// Collects definition file paths (`.yaml`/`.yml`) under a directory.
///
/// Paths come back sorted, so downstream diagnostics are deterministic.
/// A directory with no definition files is not an error; an input that is
/// not a directory is.
pub fn collect_definition_paths(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(LoaderError::InvalidInput(format!(
            "Definitions path '{}' is not a directory",
            dir.display()
        )));
    }

    let mut paths = BTreeSet::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
                continue;
            }
            let is_yaml = path.extension() == Some(OsStr::new("yaml"))
                || path.extension() == Some(OsStr::new("yml"));
            if is_yaml {
                paths.insert(path);
            }
        }
    }

    Ok(paths.into_iter().collect())
}

/// Parses and validates definition files in parallel.
///
/// The returned collections are in the same order as `paths`. Failures do
/// not short-circuit: every file is read, parsed, and validated, and all
/// problems are reported together as [`LoaderError::InvalidDefinitions`].
pub fn parse_definition_files(paths: &[PathBuf]) -> Result<Vec<SchemaCollection>> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(default_parallel_jobs(paths.len()))
        .build()
        .map_err(|e| LoaderError::InvalidInput(format!("Failed to build thread pool: {e}")))?;

    let outcomes: Vec<(PathBuf, std::result::Result<SchemaCollection, String>)> =
        pool.install(|| {
            paths
                .par_iter()
                .map(|path| (path.clone(), parse_one(path)))
                .collect()
        });

    let mut collections = Vec::with_capacity(outcomes.len());
    let mut diagnostics = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(collection) => {
                debug!(path = %path.display(), objects = collection.len(), "Parsed definition file");
                collections.push(collection);
            }
            Err(message) => diagnostics.push(FileDiagnostic { path, message }),
        }
    }

    if diagnostics.is_empty() {
        Ok(collections)
    } else {
        Err(LoaderError::InvalidDefinitions(diagnostics))
    }
}

fn parse_one(path: &Path) -> std::result::Result<SchemaCollection, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("IO error: {e}"))?;
    let collection: SchemaCollection =
        serde_yaml::from_str(&raw).map_err(|e| format!("YAML error: {e}"))?;

    let errors = validate_collection(&collection);
    if errors.is_empty() {
        Ok(collection)
    } else {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(messages.join("; "))
    }
}

/// Discovers, parses, and merges every definition file under `dir` into
/// the registry.
///
/// # Errors
///
/// Returns [`LoaderError::InvalidInput`] for a missing directory,
/// [`LoaderError::InvalidDefinitions`] when any file fails to parse or
/// validate, and [`LoaderError::Merge`] on duplicate qualified names.
pub fn load_definitions(
    registry: &mut Registry,
    dir: &Path,
    recursive: bool,
) -> Result<LoadSummary> {
    let paths = collect_definition_paths(dir, recursive)?;
    let collections = parse_definition_files(&paths)?;

    registry.merge(collections).map_err(LoaderError::Merge)?;

    let (enums, composites, tables, schemas) = registry.counts();
    let summary = LoadSummary {
        files: paths.len(),
        enums,
        composites,
        tables,
        schemas,
    };
    info!(
        dir = %dir.display(),
        files = summary.files,
        enums = summary.enums,
        composites = summary.composites,
        tables = summary.tables,
        schemas = summary.schemas,
        "Loaded definitions"
    );

    Ok(summary)
}

fn default_parallel_jobs(file_count: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(4);
    cpu_count.min(file_count.max(1))
}
