use log::{debug, trace, warn};
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Where a tool keeps its project configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSpec {
    pub name: &'static str,
    /// Dedicated config files, in priority order
    pub files: &'static [&'static str],
    /// Key holding the config inside package.json
    pub package_key: &'static str,
}

impl ConfigSpec {
    pub const BABEL: ConfigSpec = ConfigSpec {
        name: "babel",
        files: &[".babelrc", ".babelrc.json", "babel.config.json"],
        package_key: "babel",
    };

    pub const TYPESCRIPT: ConfigSpec =
        ConfigSpec { name: "ts", files: &["tsconfig.json", ".tsrc", ".tsrc.json"], package_key: "ts" };
}

/// Result of a config search. `config` is always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundConfig {
    pub config: Value,
    /// File the config was read from, None when the search came up empty
    pub source: Option<PathBuf>,
}

impl FoundConfig {
    pub fn empty() -> Self {
        Self { config: Value::Object(Map::new()), source: None }
    }
}

impl Default for FoundConfig {
    fn default() -> Self {
        Self::empty()
    }
}

/// Searches upward from the directory containing `file` for the nearest
/// configuration matching `spec`. Never fails: anything unreadable is skipped
/// and an exhausted search yields an empty config.
pub fn search_config(spec: &ConfigSpec, file: &Path) -> FoundConfig {
    let start = if file.is_dir() { Some(file) } else { file.parent() };
    debug!("Searching for {} config from {:?}", spec.name, start);

    let mut current_dir = start;
    while let Some(dir) = current_dir {
        trace!("Checking {:?} for {} config", dir, spec.name);
        if let Some(found) = config_in_dir(spec, dir) {
            debug!(
                "Found {} config at {}",
                spec.name,
                found.source.as_deref().unwrap_or(dir).display()
            );
            return found;
        }
        current_dir = dir.parent();
    }

    debug!("No {} config found, using defaults", spec.name);
    FoundConfig::empty()
}

fn config_in_dir(spec: &ConfigSpec, dir: &Path) -> Option<FoundConfig> {
    let pkg_json = dir.join("package.json");
    if pkg_json.is_file()
        && let Some(v) = read_json(&pkg_json)
        && let Some(config) = v.get(spec.package_key)
        && config.is_object()
    {
        return Some(FoundConfig { config: config.clone(), source: Some(pkg_json) });
    }

    for name in spec.files {
        let candidate = dir.join(name);
        if !candidate.is_file() {
            continue;
        }
        match read_json(&candidate) {
            Some(config) if config.is_object() => {
                return Some(FoundConfig { config, source: Some(candidate) });
            }
            _ => warn!("Ignoring unusable {} config at {}", spec.name, candidate.display()),
        }
    }

    None
}

fn read_json(path: &Path) -> Option<Value> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&strip_trailing_commas(&strip_json_comments(&content))) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

/// Removes `//` and `/* */` comments outside of string literals.
pub fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Removes commas that directly precede a closing `}` or `]`, as tsc and
/// babel accept them. Expects input without comments.
pub fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(&escaped) = chars.get(i + 1) {
                        out.push(escaped);
                        i += 1;
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_search_config_nearest_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, ".babelrc", r#"{ "presets": ["outer"] }"#);
        let inner = create_test_file(root, "packages/app/.babelrc", r#"{ "presets": ["inner"] }"#);
        let file = create_test_file(root, "packages/app/src/index.js", "");

        let found = search_config(&ConfigSpec::BABEL, &file);
        assert_eq!(found.source, Some(inner));
        assert_eq!(found.config, json!({ "presets": ["inner"] }));
    }

    #[test]
    fn test_search_config_package_json_key() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let pkg = create_test_file(
            root,
            "package.json",
            r#"{ "name": "app", "babel": { "plugins": ["x"] } }"#,
        );
        let file = create_test_file(root, "src/index.js", "");

        let found = search_config(&ConfigSpec::BABEL, &file);
        assert_eq!(found.source, Some(pkg));
        assert_eq!(found.config, json!({ "plugins": ["x"] }));
    }

    #[test]
    fn test_search_config_skips_package_json_without_key() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let tsconfig = create_test_file(
            root,
            "tsconfig.json",
            r#"{
  // comment
  "compilerOptions": { "target": "ES2017" } /* trailing */
}"#,
        );
        create_test_file(root, "lib/package.json", r#"{ "name": "lib" }"#);
        let file = create_test_file(root, "lib/index.ts", "");

        let found = search_config(&ConfigSpec::TYPESCRIPT, &file);
        assert_eq!(found.source, Some(tsconfig));
        assert_eq!(found.config["compilerOptions"]["target"], "ES2017");
    }

    #[test]
    fn test_search_config_invalid_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/.babelrc", "{ not json");
        let file = create_test_file(root, "src/index.js", "");

        let found = search_config(&ConfigSpec::BABEL, &file);
        assert_ne!(found.source, Some(root.join("src/.babelrc")));
    }

    #[test]
    fn test_empty_config_is_object() {
        let empty = FoundConfig::empty();
        assert_eq!(empty.source, None);
        assert_eq!(empty.config, json!({}));
    }

    #[test]
    fn test_strip_json_comments_keeps_strings() {
        let input = r#"{ "url": "http://example.com/*x*/", // trailing
  "a": 1 /* block */ }"#;
        let stripped = strip_json_comments(input);
        let v: Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(v["url"], "http://example.com/*x*/");
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn test_strip_json_comments_escaped_quote() {
        let input = r#"{ "q": "say \"hi\" // not a comment" }"#;
        let v: Value = serde_json::from_str(&strip_json_comments(input)).unwrap();
        assert_eq!(v["q"], "say \"hi\" // not a comment");
    }

    #[test]
    fn test_trailing_commas_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let tsconfig = create_test_file(
            root,
            "tsconfig.json",
            "{\n  \"compilerOptions\": {\n    \"target\": \"ES5\", // legacy\n  },\n  \"include\": [\"src\",],\n}",
        );
        let file = create_test_file(root, "src/index.ts", "");

        let found = search_config(&ConfigSpec::TYPESCRIPT, &file);
        assert_eq!(found.source, Some(tsconfig));
        assert_eq!(found.config, json!({ "compilerOptions": { "target": "ES5" }, "include": ["src"] }));
    }

    #[test]
    fn test_strip_trailing_commas_keeps_strings() {
        let input = r#"{ "a": ",}", "b": [1, 2,], }"#;
        let v: Value = serde_json::from_str(&strip_trailing_commas(input)).unwrap();
        assert_eq!(v, json!({ "a": ",}", "b": [1, 2] }));
    }
}
