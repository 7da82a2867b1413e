//! Coarse content categories derived from file suffixes.

use clap::ValueEnum;
use oxisize_core::FileRecord;
use regex::Regex;
use std::{
    collections::HashMap,
    fmt,
    path::{Component, Path},
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Category {
    Css,
    Html,
    Img,
    Script,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::Css, Category::Html, Category::Img, Category::Script];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Css => "css",
            Category::Html => "html",
            Category::Img => "img",
            Category::Script => "script",
        }
    }

    fn default_suffixes(self) -> &'static [&'static str] {
        match self {
            Category::Css => &["css", "less", "sass", "styl"],
            Category::Html => &["htm", "html"],
            Category::Img => &["bmp", "gif", "jpg", "jpeg", "png", "svg", "tiff", "xiff"],
            Category::Script => &["js", "ts"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Suffix sets per category. Built once and read-only afterwards; every
/// category always has an entry.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    suffixes: HashMap<Category, Vec<String>>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        let suffixes = Category::ALL
            .into_iter()
            .map(|c| (c, c.default_suffixes().iter().map(|s| s.to_string()).collect()))
            .collect();
        Self { suffixes }
    }
}

impl CategoryTable {
    /// Replaces the suffix set of `category`.
    pub fn with_suffixes<I, S>(mut self, category: Category, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes.insert(category, suffixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn suffixes(&self, category: Category) -> &[String] {
        self.suffixes.get(&category).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn by_category(&self, category: Category) -> impl Fn(&FileRecord) -> bool + '_ {
        let suffixes = self.suffixes(category);
        move |file| suffixes.iter().any(|s| *s == file.suffix)
    }
}

pub fn by_path(matcher: Regex) -> impl Fn(&FileRecord) -> bool {
    move |file| matcher.is_match(&file.resolved_path.to_string_lossy())
}

/// True when the path lies inside a `node_modules` directory.
pub fn is_vendored(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
}
