//! `std::fs`-backed `FileProvider`/`SourceReader` implementations.

use std::path::{Path, PathBuf};

use ymir_diagnostics::render::SourceReader;
use ymir_parser::FileProvider;
use ymir_span::{FileId, FileRegistry};

pub struct StdFs;

impl FileProvider for StdFs {
    fn resolve(&self, from_file: &Path, include_path: &str) -> PathBuf {
        let base = from_file.parent().unwrap_or_else(|| Path::new(""));
        base.join(include_path)
    }

    fn read(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Reloads a previously-registered file's text for diagnostic rendering,
/// looking it up through the same `FileRegistry` the parser populated.
pub struct RegistryReader<'a> {
    pub files: &'a FileRegistry,
}

impl SourceReader for RegistryReader<'_> {
    fn read(&self, file: FileId) -> std::io::Result<String> {
        std::fs::read_to_string(self.files.path(file))
    }
}
