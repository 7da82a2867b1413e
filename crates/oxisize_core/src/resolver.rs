use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::constants::{DEFAULT_MAIN_FIELDS, INDEX_FILES, RESOLVE_EXTENSIONS};

/// Export conditions tried, in order, when a package uses conditional exports
const EXPORT_CONDITIONS: &[&str] = &["import", "module", "browser", "require", "default"];

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// package.json fields that name a package's entry point, tried after `exports`
    pub main_fields: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { main_fields: DEFAULT_MAIN_FIELDS.iter().map(|f| f.to_string()).collect() }
    }
}

pub fn resolve(
    from_file: &Path,
    request: &str,
    opts: &ResolveOptions,
    cache: &DashMap<(PathBuf, String), Option<PathBuf>>,
) -> Option<PathBuf> {
    let key = (from_file.to_path_buf(), request.to_string());
    if let Some(v) = cache.get(&key) {
        trace!("Cache hit for resolve: '{}' from {}", request, from_file.display());
        return v.clone();
    }
    trace!("Resolving: '{}' from {}", request, from_file.display());

    let base = from_file.parent().unwrap_or(from_file);
    let resolved =
        if is_relative_request(request) {
            trace!("Resolving as relative import: '{}'", request);
            let p = clean(base.join(request));
            resolve_path(&p, opts)
        } else {
            trace!("Resolving as node_modules package: '{}'", request);
            resolve_node_module_from_dir(base, request, opts)
        };

    match &resolved {
        Some(p) => debug!("Resolved '{}' from {} to {}", request, from_file.display(), p.display()),
        None => trace!("Failed to resolve '{}' from {}", request, from_file.display()),
    }
    cache.insert(key, resolved.clone());
    resolved
}

/// `.`, `..` and anything starting with `./`, `../` or `/`
fn is_relative_request(request: &str) -> bool {
    matches!(request, "." | "..")
        || request.starts_with("./")
        || request.starts_with("../")
        || request.starts_with('/')
}

/// Resolves a file or directory path the way an import of it would.
pub(crate) fn resolve_path(p: &Path, opts: &ResolveOptions) -> Option<PathBuf> {
    resolve_file(p).or_else(|| if p.is_dir() { resolve_package_entry(p, opts) } else { None })
}

/// Finds the directory of an installed package by walking `node_modules`
/// directories upward from `from_dir`.
pub fn find_package(from_dir: &Path, name: &str) -> Option<PathBuf> {
    trace!("Looking up package '{}' from {}", name, from_dir.display());
    let mut current_dir = Some(from_dir);
    while let Some(dir) = current_dir {
        let candidate = dir.join("node_modules").join(name);
        if candidate.join("package.json").is_file() {
            debug!("Found package '{}' at {}", name, candidate.display());
            return Some(canonical(candidate));
        }
        current_dir = dir.parent();
    }
    debug!("Package '{}' not installed above {}", name, from_dir.display());
    None
}

fn canonical(p: PathBuf) -> PathBuf {
    p.canonicalize().unwrap_or(p)
}

fn resolve_file(p: &Path) -> Option<PathBuf> {
    if p.is_file() {
        return Some(canonical(p.to_path_buf()));
    }

    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{}.{}", p.display(), ext));
        if candidate.is_file() {
            return Some(canonical(candidate));
        }
    }

    None
}

fn resolve_index(dir: &Path) -> Option<PathBuf> {
    INDEX_FILES.iter().map(|index_file| dir.join(index_file)).find(|p| p.is_file()).map(canonical)
}

/// Splits `@scope/pkg/sub/path` into (`@scope/pkg`, `sub/path`).
fn split_package_request(request: &str) -> (&str, &str) {
    let name_segments = if request.starts_with('@') { 2 } else { 1 };
    let mut split_at = None;
    for (seen, (idx, _)) in request.match_indices('/').enumerate() {
        if seen + 1 == name_segments {
            split_at = Some(idx);
            break;
        }
    }
    match split_at {
        Some(idx) => (&request[..idx], &request[idx + 1..]),
        None => (request, ""),
    }
}

fn resolve_node_module_from_dir(
    start_dir: &Path,
    request: &str,
    opts: &ResolveOptions,
) -> Option<PathBuf> {
    let (pkg, subpath) = split_package_request(request);
    trace!("Walking up from {:?} to find node_modules for '{}'", start_dir, pkg);
    let mut current_dir = Some(start_dir);

    while let Some(dir) = current_dir {
        let nm = dir.join("node_modules").join(pkg);
        if nm.is_dir() {
            trace!("Checking node_modules at: {:?}", nm);
            let result = if subpath.is_empty() {
                resolve_package_entry(&nm, opts)
            } else {
                resolve_path(&nm.join(subpath), opts)
            };
            if result.is_some() {
                return result;
            }
        }
        current_dir = dir.parent();
    }

    None
}

fn resolve_package_entry(pkg_dir: &Path, opts: &ResolveOptions) -> Option<PathBuf> {
    let pkg_json = pkg_dir.join("package.json");
    if let Ok(txt) = fs::read_to_string(&pkg_json)
        && let Ok(v) = serde_json::from_str::<serde_json::Value>(&txt)
    {
        if let Some(exports) = v.get("exports") {
            let root_export = match exports.as_object() {
                Some(obj) if obj.keys().any(|k| k.starts_with('.')) => obj.get("."),
                _ => Some(exports),
            };
            if let Some(target) = root_export.and_then(export_target) {
                let p = clean(pkg_dir.join(target.trim_start_matches("./")));
                if let Some(resolved) = resolve_file(&p) {
                    return Some(resolved);
                }
            }
        }

        for field in &opts.main_fields {
            if let Some(s) = v.get(field.as_str()).and_then(|x| x.as_str()) {
                trace!("Trying '{}' field of {}: {}", field, pkg_json.display(), s);
                let p = clean(pkg_dir.join(s));
                if let Some(resolved) = resolve_path(&p, opts) {
                    return Some(resolved);
                }
            }
        }
    }

    resolve_index(pkg_dir)
}

/// Picks a target from an `exports` entry, walking nested condition objects.
fn export_target(entry: &serde_json::Value) -> Option<&str> {
    if let Some(s) = entry.as_str() {
        return Some(s);
    }
    let conditions = entry.as_object()?;
    EXPORT_CONDITIONS.iter().filter_map(|key| conditions.get(*key)).find_map(export_target)
}
