//! Lookup of tooling installed in the project being measured.
//!
//! Transpilers and their plugins are located from the measured file's own
//! directory, so the project decides which tools apply to it.

use log::{debug, trace};
use path_clean::clean;
use serde::Deserialize;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// An installed package found from a file's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    pub name: String,
    pub dir: PathBuf,
    pub version: Option<String>,
}

pub trait ToolLocator: Send + Sync {
    /// Locates `package` from `from_dir`. `None` means it is not installed.
    fn locate(&self, package: &str, from_dir: &Path) -> Option<ToolHandle>;
}

/// Node-style lookup through `node_modules` directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeModulesLocator;

#[derive(Deserialize)]
struct PackageManifest {
    version: Option<String>,
}

impl ToolLocator for NodeModulesLocator {
    fn locate(&self, package: &str, from_dir: &Path) -> Option<ToolHandle> {
        let dir = oxisize_core::find_package(from_dir, package)?;
        let version = fs::read_to_string(dir.join("package.json"))
            .ok()
            .and_then(|txt| serde_json::from_str::<PackageManifest>(&txt).ok())
            .and_then(|m| m.version);
        Some(ToolHandle { name: package.to_string(), dir, version })
    }
}

/// First of `packages` installed relative to `from_dir`.
pub fn locate_first(
    locator: &dyn ToolLocator,
    packages: &[&str],
    from_dir: &Path,
) -> Option<ToolHandle> {
    packages.iter().find_map(|p| locator.locate(p, from_dir))
}

/// Rewrites babel `presets`/`plugins` names in `config` into absolute package
/// directories resolved from `from_dir`. Names that cannot be found are left
/// as they are.
pub fn resolve_babel_entries(config: &mut Value, from_dir: &Path, locator: &dyn ToolLocator) {
    for (key, kind) in [("presets", "preset"), ("plugins", "plugin")] {
        let Some(entries) = config.get_mut(key).and_then(Value::as_array_mut) else {
            continue;
        };
        for entry in entries.iter_mut() {
            // "name" or ["name", { options }]
            let name_slot = match entry {
                Value::Array(pair) => pair.first_mut(),
                other => Some(other),
            };
            let Some(slot) = name_slot else { continue };
            let Some(name) = slot.as_str().map(str::to_owned) else { continue };

            match resolve_babel_entry(&name, kind, from_dir, locator) {
                Some(dir) => {
                    trace!("Re-resolved babel {} '{}' to {}", kind, name, dir.display());
                    *slot = Value::String(dir.to_string_lossy().to_string());
                }
                None => {
                    debug!("Could not resolve babel {} '{}' from {}", kind, name, from_dir.display())
                }
            }
        }
    }
}

fn resolve_babel_entry(
    name: &str,
    kind: &str,
    from_dir: &Path,
    locator: &dyn ToolLocator,
) -> Option<PathBuf> {
    if name.starts_with("./") || name.starts_with("../") || name.starts_with('/') {
        let p = clean(from_dir.join(name));
        return p.exists().then_some(p);
    }

    let mut candidates = vec![name.to_string()];
    if !name.starts_with('@') && !name.starts_with(&format!("babel-{}-", kind)) {
        candidates.push(format!("babel-{}-{}", kind, name));
        candidates.push(format!("@babel/{}-{}", kind, name));
    }
    candidates.iter().find_map(|c| locator.locate(c, from_dir)).map(|handle| handle.dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn install(root: &Path, name: &str, version: &str) -> PathBuf {
        let dir = root.join("node_modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        let manifest = format!(r#"{{"name":"{}","version":"{}"}}"#, name, version);
        fs::write(dir.join("package.json"), manifest).unwrap();
        dir.canonicalize().unwrap()
    }

    #[test]
    fn test_locate_reads_version() {
        let temp_dir = TempDir::new().unwrap();
        let dir = install(temp_dir.path(), "typescript", "5.4.5");
        let src = temp_dir.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let handle = NodeModulesLocator.locate("typescript", &src).unwrap();
        assert_eq!(handle.dir, dir);
        assert_eq!(handle.version.as_deref(), Some("5.4.5"));
    }

    #[test]
    fn test_locate_first_prefers_order() {
        let temp_dir = TempDir::new().unwrap();
        install(temp_dir.path(), "babel-core", "6.26.0");
        let modern = install(temp_dir.path(), "@babel/core", "7.24.0");

        let handle =
            locate_first(&NodeModulesLocator, &["@babel/core", "babel-core"], temp_dir.path())
                .unwrap();
        assert_eq!(handle.dir, modern);

        assert!(locate_first(&NodeModulesLocator, &["typescript"], temp_dir.path()).is_none());
    }

    #[test]
    fn test_resolve_babel_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let env = install(root, "@babel/preset-env", "7.24.0");
        let legacy = install(root, "babel-plugin-transform-runtime", "6.23.0");
        let local = root.join("tools/plugin.js");
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(&local, "module.exports = {};").unwrap();

        let mut config = json!({
            "presets": [["env", { "targets": "es2015" }], "missing"],
            "plugins": ["transform-runtime", "./tools/plugin.js"]
        });
        resolve_babel_entries(&mut config, root, &NodeModulesLocator);

        assert_eq!(config["presets"][0][0], &*env.to_string_lossy());
        assert_eq!(config["presets"][0][1]["targets"], "es2015");
        assert_eq!(config["presets"][1], "missing");
        assert_eq!(config["plugins"][0], &*legacy.to_string_lossy());
        let local_resolved = clean(root.join("tools/plugin.js"));
        assert_eq!(config["plugins"][1], &*local_resolved.to_string_lossy());
    }
}
