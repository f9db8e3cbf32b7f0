//! Definition file loading for declarative Postgres schemas.
//!
//! This crate turns a directory of YAML definition documents into a
//! populated [`pgweave_core::Registry`]:
//!
//! - [`collect_definition_paths`] — deterministic `.yaml`/`.yml` discovery,
//!   optionally recursive.
//! - [`parse_definition_files`] — parallel parse and structural validation
//!   with collective, per-file diagnostics.
//! - [`load_definitions`] — the full pipeline, ending in a registry merge
//!   and a [`LoadSummary`].
//! - [`GenerateConfig`] — YAML-backed settings for a generation run.
//!
//! # Example
//!
//! ```no_run
//! use pgweave_core::Registry;
//! use pgweave_loader::load_definitions;
//!
//! let mut registry = Registry::new();
//! let summary = load_definitions(&mut registry, "schema/".as_ref(), true)?;
//! println!("loaded {} tables from {} files", summary.tables, summary.files);
//! # Ok::<(), pgweave_loader::LoaderError>(())
//! ```

mod config;
mod error;
mod loader;

pub use config::{DEFAULT_HEADER, GenerateConfig};
pub use error::{FileDiagnostic, LoaderError, Result};
pub use loader::{LoadSummary, collect_definition_paths, load_definitions, parse_definition_files};
