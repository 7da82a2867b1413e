use clap::Parser;
use std::path::PathBuf;

use crate::{category::Category, minify::CompilationLevel, types::Options};

#[derive(Debug, Clone, Parser)]
#[command(name = "oxisize")]
#[command(about = "Estimate the bundle size of a module and everything it imports")]
pub struct Config {
    /// Entry file or package directory
    pub entry: PathBuf,

    /// Minify scripts before measuring
    #[arg(short, long)]
    pub minify: bool,

    /// Report gzip-compressed size
    #[arg(short, long)]
    pub gzip: bool,

    /// Categories to report, one line each
    #[arg(long = "category", value_enum, default_values_t = [Category::Script])]
    pub categories: Vec<Category>,

    /// Leave files under node_modules out of the measurement
    #[arg(long)]
    pub exclude_node_modules: bool,

    /// package.json fields tried, in order, when resolving a package entry
    #[arg(long = "main-field", default_values_t = ["module".to_string(), "main".to_string()])]
    pub main_fields: Vec<String>,

    /// How aggressively the minifier works
    #[arg(long, value_enum, default_value_t = CompilationLevel::Advanced)]
    pub level: CompilationLevel,

    /// Do not transpile files under node_modules
    #[arg(long)]
    pub skip_vendored_transpile: bool,
}

impl Config {
    pub fn options(&self) -> Options {
        Options {
            minify: self.minify,
            gzip: self.gzip,
            categories: self.categories.clone(),
            include_node_modules: !self.exclude_node_modules,
            main_fields: self.main_fields.clone(),
            compilation_level: self.level,
            skip_vendored_transpile: self.skip_vendored_transpile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::try_parse_from(["oxisize", "src/index.js"]).unwrap();
        let options = cfg.options();

        assert_eq!(cfg.entry, PathBuf::from("src/index.js"));
        assert!(!options.minify);
        assert!(!options.gzip);
        assert_eq!(options.categories, vec![Category::Script]);
        assert!(options.include_node_modules);
        assert_eq!(options.main_fields, vec!["module", "main"]);
        assert_eq!(options.compilation_level, CompilationLevel::Advanced);
        assert!(!options.skip_vendored_transpile);
    }

    #[test]
    fn test_flags() {
        let cfg = Config::try_parse_from([
            "oxisize",
            "index.js",
            "-m",
            "-g",
            "--category",
            "css",
            "--category",
            "script",
            "--exclude-node-modules",
            "--main-field",
            "browser",
            "--level",
            "whitespace-only",
            "--skip-vendored-transpile",
        ])
        .unwrap();
        let options = cfg.options();

        assert!(options.minify);
        assert!(options.gzip);
        assert_eq!(options.categories, vec![Category::Css, Category::Script]);
        assert!(!options.include_node_modules);
        assert_eq!(options.main_fields, vec!["browser"]);
        assert_eq!(options.compilation_level, CompilationLevel::WhitespaceOnly);
        assert!(options.skip_vendored_transpile);
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(Config::try_parse_from(["oxisize", "index.js", "--category", "fonts"]).is_err());
    }

    #[test]
    fn test_entry_required() {
        assert!(Config::try_parse_from(["oxisize"]).is_err());
    }
}
