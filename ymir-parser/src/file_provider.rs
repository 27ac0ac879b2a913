//! Decouples the parser from `std::fs`: the core only needs the capability
//! to resolve an include path relative to a parent file and read its text.

use std::path::{Path, PathBuf};

/// Resolves and reads `.ymr` source files on the parser's behalf.
pub trait FileProvider {
    /// Resolves `include_path` as seen from `from_file`, returning a
    /// canonical-enough key that two includes of "the same" file produce
    /// equal values (used for cycle detection).
    fn resolve(&self, from_file: &Path, include_path: &str) -> PathBuf;

    /// Reads the full text of `path`.
    fn read(&self, path: &Path) -> std::io::Result<String>;
}
