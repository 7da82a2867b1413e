//! Bundle size estimation for JavaScript/TypeScript modules.
//!
//! Starting from an entry file, this crate traces every statically imported
//! file, transpiles each one with the project's own tooling configuration,
//! optionally minifies the scripts, concatenates them in load order and
//! reports the size of the result, raw or gzipped, per content category.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use oxisize_bundle_size::{Category, Options, print_sizes, run};
//! use std::io::{BufWriter, Write};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = Options {
//!     minify: true,
//!     gzip: true,
//!     categories: vec![Category::Script, Category::Css],
//!     ..Options::default()
//! };
//!
//! let report = run(Path::new("/path/to/project/src/index.js"), &options)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! print_sizes(&mut stdout, &report)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom engines
//!
//! The transform and minify engines sit behind the [`Transform`] and
//! [`Minify`] traits; [`run_with_toolchain`] accepts any implementation.

mod category;
mod checker;
mod config;
mod dependency;
mod engine;
mod error;
mod measure;
mod memo;
mod minify;
mod paths;
mod reporter;
mod tooling;
mod transpile;
mod types;

// Re-export public API
pub use category::{Category, CategoryTable, by_path, is_vendored};
pub use checker::{run, run_bundle_size_check, run_with_toolchain};
pub use config::Config;
pub use dependency::{Dependency, Toolchain, View, min_views, raw_views, views};
pub use engine::{OxcBabel, OxcMinifier, OxcTypeScript};
pub use error::{Result, SizeError};
pub use measure::{gz_size, join, measure, size};
pub use memo::{Memo, MemoState};
pub use minify::{CompilationLevel, Minify};
pub use reporter::{format_size, print_sizes};
pub use tooling::{NodeModulesLocator, ToolHandle, ToolLocator, locate_first};
pub use transpile::{PathExclusion, Strategy, Transform, Transpilers};
pub use types::{CategorySize, Options, SizeReport};
