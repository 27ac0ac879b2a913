//! Parser-level error types.
//!
//! Most grammar and semantic violations are recorded as `Diagnostic`s so
//! the parser can recover and keep going; these `Error`
//! variants are reserved for include resolution, which has no sensible
//! partial-recovery story once a file can't be found or a cycle closes.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IncludeError {
    #[error("include file not found: {0}")]
    NotFound(PathBuf),

    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("include cycle detected: {0}")]
    Cycle(String),
}
