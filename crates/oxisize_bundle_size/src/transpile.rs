use log::{debug, trace};
use oxisize_core::{ConfigSpec, FileRecord, search_config};
use regex::Regex;
use serde_json::Value;
use std::{fs, path::Path, sync::Arc};

use crate::{
    category::is_vendored,
    engine::{OxcBabel, OxcTypeScript},
    error::{Result, SizeError},
    paths::relativize_to_cwd,
    tooling::{NodeModulesLocator, ToolLocator, locate_first, resolve_babel_entries},
};

/// Converts source text into plain script.
pub trait Transform: Send + Sync {
    fn transform(&self, source: &str, path: &Path, config: &Value) -> Result<String>;
}

/// How files of a given suffix are turned into plain script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Suffixes shared with plain script; transpiled only when the project has babel
    Babel,
    /// Suffixes unusable without the TypeScript compiler
    TypeScript,
    PassThrough,
}

impl Strategy {
    pub fn for_suffix(suffix: &str) -> Self {
        match suffix {
            "js" | "mjs" | "cjs" | "jsx" => Strategy::Babel,
            "ts" | "mts" | "cts" | "tsx" => Strategy::TypeScript,
            _ => Strategy::PassThrough,
        }
    }

    /// Packages that provide the tool, in lookup order
    pub fn tool_packages(self) -> &'static [&'static str] {
        match self {
            Strategy::Babel => &["@babel/core", "babel-core"],
            Strategy::TypeScript => &["typescript"],
            Strategy::PassThrough => &[],
        }
    }

    pub fn tool_name(self) -> &'static str {
        match self {
            Strategy::Babel => "Babel",
            Strategy::TypeScript => "TypeScript",
            Strategy::PassThrough => "none",
        }
    }
}

/// Files the registry returns untouched whatever their suffix.
#[derive(Debug, Clone)]
pub enum PathExclusion {
    Vendored,
    Pattern(Regex),
}

impl PathExclusion {
    pub fn excludes(&self, path: &Path) -> bool {
        match self {
            PathExclusion::Vendored => is_vendored(path),
            PathExclusion::Pattern(re) => re.is_match(&path.to_string_lossy()),
        }
    }
}

pub struct Transpilers {
    locator: Arc<dyn ToolLocator>,
    babel: Arc<dyn Transform>,
    typescript: Arc<dyn Transform>,
    exclusion: Option<PathExclusion>,
}

impl Transpilers {
    pub fn new(
        locator: Arc<dyn ToolLocator>,
        babel: Arc<dyn Transform>,
        typescript: Arc<dyn Transform>,
    ) -> Self {
        Self { locator, babel, typescript, exclusion: None }
    }

    /// Project tooling looked up in node_modules, transforms run by oxc.
    pub fn oxc() -> Self {
        Self::new(Arc::new(NodeModulesLocator), Arc::new(OxcBabel), Arc::new(OxcTypeScript))
    }

    pub fn with_exclusion(mut self, exclusion: PathExclusion) -> Self {
        self.exclusion = Some(exclusion);
        self
    }

    /// Reads `file` and converts it to plain script.
    pub fn transpile(&self, file: &FileRecord) -> Result<String> {
        let path = &file.resolved_path;
        let bytes = fs::read(path)
            .map_err(|e| SizeError::Io { path: path.clone(), source: Arc::new(e) })?;
        let contents = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        self.transpile_source(file, contents)
    }

    pub fn transpile_source(&self, file: &FileRecord, contents: String) -> Result<String> {
        let path = file.resolved_path.as_path();
        if let Some(exclusion) = &self.exclusion
            && exclusion.excludes(path)
        {
            trace!("Transpilation excluded for {}", path.display());
            return Ok(contents);
        }

        let strategy = Strategy::for_suffix(&file.suffix);
        let dir = path.parent().unwrap_or(path);
        let tool = match strategy {
            Strategy::PassThrough => return Ok(contents),
            _ => locate_first(self.locator.as_ref(), strategy.tool_packages(), dir),
        };

        match (strategy, tool) {
            (Strategy::Babel, None) => {
                // .js is already plain script when the project has no babel
                trace!("No babel installed for {}, leaving as is", path.display());
                Ok(contents)
            }
            (Strategy::Babel, Some(tool)) => {
                debug!("Transpiling {} with {} {:?}", path.display(), tool.name, tool.version);
                let mut config = search_config(&ConfigSpec::BABEL, path).config;
                // Presets and plugins must come from the measured project
                resolve_babel_entries(&mut config, dir, self.locator.as_ref());
                if let Value::Object(map) = &mut config {
                    map.insert("babelrc".to_string(), Value::Bool(false));
                    map.insert("filename".to_string(), Value::String(relativize_to_cwd(path)));
                }
                self.babel.transform(&contents, path, &config)
            }
            (Strategy::TypeScript, None) => Err(SizeError::MissingTool {
                path: path.to_path_buf(),
                tool: strategy.tool_name().to_string(),
            }),
            (Strategy::TypeScript, Some(tool)) => {
                debug!("Transpiling {} with {} {:?}", path.display(), tool.name, tool.version);
                let config = search_config(&ConfigSpec::TYPESCRIPT, path).config;
                self.typescript.transform(&contents, path, &config)
            }
            (Strategy::PassThrough, _) => Ok(contents),
        }
    }
}
