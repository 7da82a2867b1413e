use oxisize_core::TraceError;
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SizeError>;

/// Every failure is fatal to the run. Errors are `Clone` so a memoized view
/// can hand the same failure to every caller.
#[derive(Debug, Clone, Error)]
pub enum SizeError {
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("Trying to transpile {} but {tool} was not found.", .path.display())]
    MissingTool { path: PathBuf, tool: String },

    #[error("Failed to transpile {}: {message}", .path.display())]
    Transpile { path: PathBuf, message: String },

    #[error("Failed to minify {}: {message}", .path.display())]
    Minify { path: PathBuf, message: String },

    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Failed to gzip output")]
    Compress(#[source] Arc<std::io::Error>),
}
