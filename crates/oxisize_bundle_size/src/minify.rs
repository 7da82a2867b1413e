use clap::ValueEnum;
use std::path::Path;

use crate::error::Result;

/// Reduces plain script to its smallest equivalent form.
pub trait Minify: Send + Sync {
    /// `path` names the file the source came from, for error reporting.
    fn minify(&self, source: &str, path: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CompilationLevel {
    /// Reprint compactly, nothing renamed or removed
    WhitespaceOnly,
    /// Compress without renaming
    Simple,
    /// Compress and mangle names
    #[default]
    Advanced,
}
