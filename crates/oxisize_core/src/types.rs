use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Specifier {
    pub request: String,
    pub kind: SpecKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    Static,
    Dynamic,
}

/// A file reached from the entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    /// Absolute path, unique within one trace
    pub resolved_path: PathBuf,
    /// Lowercase extension without the dot, empty if the file has none
    pub suffix: String,
}

impl FileRecord {
    pub fn new(resolved_path: impl Into<PathBuf>) -> Self {
        let resolved_path = resolved_path.into();
        let suffix = suffix_of(&resolved_path);
        Self { resolved_path, suffix }
    }
}

fn suffix_of(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).unwrap_or_default()
}
