//! Default transform and minify engines, backed by oxc.

use log::{trace, warn};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{TransformOptions, Transformer};
use oxisize_core::source_type_for;
use serde_json::Value;
use std::path::Path;

use crate::{
    error::{Result, SizeError},
    minify::{CompilationLevel, Minify},
    transpile::Transform,
};

/// Target used when a babel env preset does not name one
const DEFAULT_ENV_TARGET: &str = "es2015";

/// Babel-compatible engine. Understands the env and react presets.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcBabel;

impl Transform for OxcBabel {
    fn transform(&self, source: &str, path: &Path, config: &Value) -> Result<String> {
        let presets = preset_entries(config);
        let env = presets.iter().find(|(name, _)| is_preset(name, "env"));
        let react = presets.iter().any(|(name, _)| is_preset(name, "react"));

        let options = match env {
            Some((_, preset_options)) => {
                let target = env_target(preset_options.and_then(|o| o.get("targets")));
                options_for_target(&target, path)
            }
            None => TransformOptions::default(),
        };

        let source_type = source_type_for(path).with_jsx(react || source_type_for(path).is_jsx());
        transform_with_oxc(source, path, source_type, &options)
    }
}

/// TypeScript engine: strips types and lowers to `compilerOptions.target`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcTypeScript;

impl Transform for OxcTypeScript {
    fn transform(&self, source: &str, path: &Path, config: &Value) -> Result<String> {
        let target = config
            .get("compilerOptions")
            .and_then(|o| o.get("target"))
            .and_then(Value::as_str);
        let options = match target {
            Some(target) => options_for_target(&es_target(target), path),
            None => TransformOptions::default(),
        };
        transform_with_oxc(source, path, source_type_for(path), &options)
    }
}

/// Whole-program minifier. The level decides how aggressive it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcMinifier {
    pub level: CompilationLevel,
}

impl OxcMinifier {
    pub fn new(level: CompilationLevel) -> Self {
        Self { level }
    }
}

impl Minify for OxcMinifier {
    fn minify(&self, source: &str, path: &Path) -> Result<String> {
        let allocator = Allocator::default();
        // Input is already plain script
        let source_type = SourceType::mjs();
        let ParserReturn { mut program, errors, panicked, .. } =
            Parser::new(&allocator, source, source_type).parse();
        if panicked || !errors.is_empty() {
            return Err(SizeError::Minify {
                path: path.to_path_buf(),
                message: join_messages(errors.iter().map(ToString::to_string)),
            });
        }

        let codegen = Codegen::new().with_options(CodegenOptions::minify());
        let code = match self.level {
            CompilationLevel::WhitespaceOnly => codegen.build(&program).code,
            CompilationLevel::Simple | CompilationLevel::Advanced => {
                let options = MinifierOptions {
                    mangle: (self.level == CompilationLevel::Advanced)
                        .then(MangleOptions::default),
                    compress: Some(CompressOptions::smallest()),
                };
                let ret = Minifier::new(options).minify(&allocator, &mut program);
                codegen.with_scoping(ret.scoping).build(&program).code
            }
        };
        trace!("Minified {} from {} to {} bytes", path.display(), source.len(), code.len());
        Ok(code)
    }
}

/// Oldest language level the transformer lowers to
const LOWEST_ES_TARGET: &str = "es2015";

/// Normalizes a tsconfig-style target (`ES5`, `ES2017`, `ESNext`).
fn es_target(target: &str) -> String {
    let target = target.trim().to_ascii_lowercase();
    match target.as_str() {
        "es3" | "es5" | "es6" => LOWEST_ES_TARGET.to_string(),
        _ => target,
    }
}

/// Converts babel env `targets` into a comma separated engine list such as
/// `ie11,chrome40`.
///
/// Accepts a query string, an array of queries, or an object mapping engines
/// to versions with an optional `browsers` query list. `node: "current"` and
/// `esmodules` add nothing.
fn env_target(targets: Option<&Value>) -> String {
    let mut engines = Vec::new();
    match targets {
        Some(Value::String(query)) => push_queries(query, &mut engines),
        Some(Value::Array(queries)) => {
            queries.iter().filter_map(Value::as_str).for_each(|q| push_queries(q, &mut engines))
        }
        Some(Value::Object(map)) => {
            for (engine, version) in map {
                match (engine.as_str(), version) {
                    ("browsers", Value::String(query)) => push_queries(query, &mut engines),
                    ("browsers", Value::Array(queries)) => queries
                        .iter()
                        .filter_map(Value::as_str)
                        .for_each(|q| push_queries(q, &mut engines)),
                    ("esmodules", _) | (_, Value::Bool(_)) => {}
                    (_, Value::String(v)) if v == "current" => {}
                    (_, Value::String(v)) => engines.push(format!("{}{}", engine, v.trim())),
                    (_, Value::Number(v)) => engines.push(format!("{}{}", engine, v)),
                    _ => {}
                }
            }
        }
        _ => {}
    }

    if engines.is_empty() {
        return match targets {
            // Only the running node or module-capable browsers were named
            Some(Value::Object(_)) => "esnext".to_string(),
            _ => DEFAULT_ENV_TARGET.to_string(),
        };
    }
    engines.join(",")
}

/// `"ie 11, chrome 40"` becomes `ie11` and `chrome40`.
fn push_queries(query: &str, engines: &mut Vec<String>) {
    for part in query.split(',') {
        let part: String = part.split_whitespace().collect::<String>().to_ascii_lowercase();
        if part.is_empty() {
            continue;
        }
        if part.starts_with("es") {
            engines.push(es_target(&part));
        } else {
            engines.push(part);
        }
    }
}

fn options_for_target(target: &str, path: &Path) -> TransformOptions {
    TransformOptions::from_target(target).unwrap_or_else(|e| {
        warn!("Ignoring target '{}' for {}: {}", target, path.display(), e);
        TransformOptions::default()
    })
}

fn transform_with_oxc(
    source: &str,
    path: &Path,
    source_type: SourceType,
    options: &TransformOptions,
) -> Result<String> {
    let allocator = Allocator::default();
    let ParserReturn { mut program, errors, panicked, .. } =
        Parser::new(&allocator, source, source_type).parse();
    if panicked || !errors.is_empty() {
        return Err(SizeError::Transpile {
            path: path.to_path_buf(),
            message: join_messages(errors.iter().map(ToString::to_string)),
        });
    }

    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let ret = Transformer::new(&allocator, path, options).build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(SizeError::Transpile {
            path: path.to_path_buf(),
            message: join_messages(ret.errors.iter().map(ToString::to_string)),
        });
    }

    Ok(Codegen::new().build(&program).code)
}

fn join_messages(messages: impl Iterator<Item = String>) -> String {
    let joined = messages.collect::<Vec<_>>().join("; ");
    if joined.is_empty() { "unrecoverable syntax error".to_string() } else { joined }
}

/// (name, options) for each babel preset entry
fn preset_entries(config: &Value) -> Vec<(String, Option<&Value>)> {
    let Some(presets) = config.get("presets").and_then(Value::as_array) else {
        return Vec::new();
    };
    presets
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some((name.clone(), None)),
            Value::Array(pair) => {
                pair.first().and_then(Value::as_str).map(|name| (name.to_string(), pair.get(1)))
            }
            _ => None,
        })
        .collect()
}

/// Matches `short`, `babel-preset-<short>`, `@babel/preset-<short>`, and
/// directories of those packages.
fn is_preset(name: &str, short: &str) -> bool {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name);
    name == short || last == format!("preset-{}", short) || last == format!("babel-preset-{}", short)
}
