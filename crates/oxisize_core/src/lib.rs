//! Dependency tracing for JavaScript/TypeScript modules.
//!
//! This crate turns an entry file into the ordered list of files it statically
//! pulls in, and provides the lookups the size pipeline builds on:
//! - Parsing import/export/require specifiers from JS/TS files
//! - Resolving module paths (relative, node_modules, package entry fields)
//! - Locating installed packages from a directory
//! - Searching upward for project configuration files

mod config;
mod constants;
mod error;
mod parser;
mod resolver;
mod tracer;
mod types;

// Re-export public API
pub use config::{ConfigSpec, FoundConfig, search_config, strip_json_comments, strip_trailing_commas};
pub use constants::{
    DEFAULT_MAIN_FIELDS, INDEX_FILES, JS_TS_EXTENSIONS, NODE_BUILTINS, RESOLVE_EXTENSIONS,
    is_node_builtin,
};
pub use error::TraceError;
pub use parser::{imports_for, source_type_for};
pub use resolver::{ResolveOptions, find_package, resolve};
pub use tracer::{TraceOptions, trace};
pub use types::{FileRecord, SpecKind, Specifier};
