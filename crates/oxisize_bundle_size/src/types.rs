use oxisize_core::DEFAULT_MAIN_FIELDS;

use crate::{category::Category, minify::CompilationLevel};

#[derive(Debug, Clone)]
pub struct Options {
    pub minify: bool,
    pub gzip: bool,
    pub categories: Vec<Category>,
    /// When false, files under `node_modules` are left out of every category
    pub include_node_modules: bool,
    pub main_fields: Vec<String>,
    pub compilation_level: CompilationLevel,
    /// Leave vendored files untranspiled
    pub skip_vendored_transpile: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            minify: false,
            gzip: false,
            categories: vec![Category::Script],
            include_node_modules: true,
            main_fields: DEFAULT_MAIN_FIELDS.iter().map(|f| f.to_string()).collect(),
            compilation_level: CompilationLevel::default(),
            skip_vendored_transpile: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySize {
    pub category: Category,
    pub bytes: u64,
    /// Files that went into the measurement
    pub files: usize,
}

#[derive(Debug, Clone)]
pub struct SizeReport {
    /// One entry per requested category, in request order
    pub sizes: Vec<CategorySize>,
    pub files_traced: usize,
}

impl SizeReport {
    pub fn size_of(&self, category: Category) -> Option<u64> {
        self.sizes.iter().find(|s| s.category == category).map(|s| s.bytes)
    }
}
