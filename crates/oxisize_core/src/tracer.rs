use dashmap::DashMap;
use log::{debug, info, trace};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use crate::{
    constants::{JS_TS_EXTENSIONS, is_node_builtin},
    error::TraceError,
    parser::imports_for,
    resolver::{ResolveOptions, resolve, resolve_path},
    types::{FileRecord, SpecKind, Specifier},
};

#[derive(Debug, Clone, Default)]
pub struct TraceOptions {
    pub resolve: ResolveOptions,
}

impl TraceOptions {
    pub fn with_main_fields(main_fields: Vec<String>) -> Self {
        Self { resolve: ResolveOptions { main_fields } }
    }
}

enum Visit {
    Enter(PathBuf),
    Exit(PathBuf),
}

/// Traces every file statically reachable from `entry`.
///
/// Files come back in load order: each file appears once, after all of its
/// dependencies (cycles are broken at the first revisit). Only JS/TS files
/// are parsed for further imports; anything else they import is returned as a
/// leaf so callers can classify it.
pub fn trace(entry: &Path, opts: &TraceOptions) -> Result<Vec<FileRecord>, TraceError> {
    let absolute = std::path::absolute(entry).unwrap_or_else(|_| entry.to_path_buf());
    let entry = resolve_path(&absolute, &opts.resolve)
        .ok_or_else(|| TraceError::EntryNotFound(entry.to_path_buf()))?;
    info!("Tracing dependencies of {}", entry.display());

    // Invocation-scoped caches
    let import_cache: DashMap<PathBuf, Vec<Specifier>> = DashMap::new();
    let resolve_cache: DashMap<(PathBuf, String), Option<PathBuf>> = DashMap::new();

    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut order: Vec<FileRecord> = Vec::new();
    let mut stack = vec![Visit::Enter(entry)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(cur) => {
                if !visited.insert(cur.clone()) {
                    continue;
                }
                trace!("Visiting module: {}", cur.display());

                let deps = static_dependencies(&cur, opts, &import_cache, &resolve_cache)?;
                stack.push(Visit::Exit(cur));
                // Reversed so the first import is visited first
                for dep in deps.into_iter().rev() {
                    if !visited.contains(&dep) {
                        stack.push(Visit::Enter(dep));
                    }
                }
            }
            Visit::Exit(cur) => order.push(FileRecord::new(cur)),
        }
    }

    debug!(
        "Cache statistics: imports={}, resolutions={}",
        import_cache.len(),
        resolve_cache.len()
    );
    info!("Traced {} files", order.len());
    Ok(order)
}

fn static_dependencies(
    file: &Path,
    opts: &TraceOptions,
    import_cache: &DashMap<PathBuf, Vec<Specifier>>,
    resolve_cache: &DashMap<(PathBuf, String), Option<PathBuf>>,
) -> Result<Vec<PathBuf>, TraceError> {
    let parsable = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| JS_TS_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if !parsable {
        trace!("Not following imports of {}", file.display());
        return Ok(Vec::new());
    }

    let mut deps = Vec::new();
    for spec in imports_for(file, import_cache)? {
        if spec.kind == SpecKind::Dynamic {
            trace!("Skipping dynamic import '{}'", spec.request);
            continue;
        }
        match resolve(file, &spec.request, &opts.resolve, resolve_cache) {
            Some(next) => deps.push(next),
            None if is_node_builtin(&spec.request) => {
                debug!("Skipping Node built-in '{}' in {}", spec.request, file.display());
            }
            None => {
                return Err(TraceError::Unresolved {
                    request: spec.request,
                    from: file.to_path_buf(),
                });
            }
        }
    }
    Ok(deps)
}
