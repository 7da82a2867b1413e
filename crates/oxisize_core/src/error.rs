use std::{path::PathBuf, sync::Arc};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TraceError {
    #[error("Cannot resolve entry {}", .0.display())]
    EntryNotFound(PathBuf),

    #[error("Cannot resolve '{request}' imported from {}", .from.display())]
    Unresolved { request: String, from: PathBuf },

    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}
