use log::{debug, info, trace};
use oxisize_core::{TraceOptions, trace};
use std::{path::Path, sync::Arc, time::Instant};

use crate::{
    category::{Category, CategoryTable, is_vendored},
    config::Config,
    dependency::{Dependency, Toolchain, View, views},
    engine::OxcMinifier,
    error::{Result, SizeError},
    measure::{join, measure},
    transpile::{PathExclusion, Transpilers},
    types::{CategorySize, Options, SizeReport},
};

pub fn run_bundle_size_check(cfg: Config) -> Result<SizeReport> {
    let options = cfg.options();
    debug!("Options: {:?}", options);
    run(&cfg.entry, &options)
}

/// Measures `entry` and everything it statically imports, with the default
/// oxc engines.
pub fn run(entry: &Path, options: &Options) -> Result<SizeReport> {
    let mut transpilers = Transpilers::oxc();
    if options.skip_vendored_transpile {
        transpilers = transpilers.with_exclusion(PathExclusion::Vendored);
    }
    let toolchain =
        Toolchain::new(transpilers, Arc::new(OxcMinifier::new(options.compilation_level)));
    run_with_toolchain(entry, options, Arc::new(toolchain), &CategoryTable::default())
}

pub fn run_with_toolchain(
    entry: &Path,
    options: &Options,
    toolchain: Arc<Toolchain>,
    table: &CategoryTable,
) -> Result<SizeReport> {
    info!("Measuring {}", entry.display());
    let start = Instant::now();

    let records = trace(entry, &TraceOptions::with_main_fields(options.main_fields.clone()))?;
    let files_traced = records.len();
    info!("Traced {} files in {}ms", files_traced, start.elapsed().as_millis());

    let deps: Vec<Dependency> = records
        .into_iter()
        .map(|record| Dependency::new(record, Arc::clone(&toolchain)))
        .collect();

    let mut sizes = Vec::with_capacity(options.categories.len());
    for &category in &options.categories {
        let in_category = table.by_category(category);
        let selected: Vec<&Dependency> = deps
            .iter()
            .filter(|d| in_category(d.record()))
            .filter(|d| options.include_node_modules || !is_vendored(&d.record().resolved_path))
            .collect();
        debug!("{} files in category {}", selected.len(), category);

        let view = view_for(category, options.minify);
        let texts = views(&selected, view)?;
        let bytes = measure(&join(&texts), options.gzip)
            .map_err(|e| SizeError::Compress(Arc::new(e)))?;
        trace!("{} measured {} bytes ({:?}, gzip: {})", category, bytes, view, options.gzip);

        sizes.push(CategorySize { category, bytes, files: selected.len() });
    }

    info!("Finished in {}ms", start.elapsed().as_millis());
    Ok(SizeReport { sizes, files_traced })
}

/// Only scripts go through the minifier; other content is measured as read.
fn view_for(category: Category, minify: bool) -> View {
    if minify && category == Category::Script { View::Min } else { View::Raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        minify::Minify,
        tooling::{ToolHandle, ToolLocator},
        transpile::Transform,
    };
    use serde_json::Value;
    use std::{
        fs,
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
    };
    use tempfile::TempDir;

    struct NothingInstalled;

    impl ToolLocator for NothingInstalled {
        fn locate(&self, _package: &str, _from_dir: &Path) -> Option<ToolHandle> {
            None
        }
    }

    struct Identity;

    impl Transform for Identity {
        fn transform(&self, source: &str, _path: &Path, _config: &Value) -> Result<String> {
            Ok(source.to_string())
        }
    }

    /// Trims each file, counting calls.
    #[derive(Default)]
    struct TrimMinifier {
        calls: AtomicUsize,
    }

    impl Minify for TrimMinifier {
        fn minify(&self, source: &str, _path: &Path) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(source.trim().to_string())
        }
    }

    fn toolchain(minifier: Arc<TrimMinifier>) -> Arc<Toolchain> {
        let transpilers =
            Transpilers::new(Arc::new(NothingInstalled), Arc::new(Identity), Arc::new(Identity));
        Arc::new(Toolchain::new(transpilers, minifier))
    }

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_view_for() {
        assert_eq!(view_for(Category::Script, true), View::Min);
        assert_eq!(view_for(Category::Script, false), View::Raw);
        assert_eq!(view_for(Category::Css, true), View::Raw);
    }

    #[test]
    fn test_sizes_per_category() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "a.js", "\"a\";");
        create_test_file(root, "style.css", "p{}");
        let entry = create_test_file(root, "index.js", "import './a';\nimport './style.css';\n");

        let options = Options {
            categories: vec![Category::Script, Category::Css, Category::Img],
            ..Options::default()
        };
        let report = run_with_toolchain(
            &entry,
            &options,
            toolchain(Arc::new(TrimMinifier::default())),
            &CategoryTable::default(),
        )
        .unwrap();

        assert_eq!(report.files_traced, 3);
        let script_bytes = "\"a\";".len() + "import './a';\nimport './style.css';\n".len();
        assert_eq!(report.size_of(Category::Script), Some(script_bytes as u64));
        assert_eq!(report.size_of(Category::Css), Some(3));
        assert_eq!(
            report.sizes[2],
            CategorySize { category: Category::Img, bytes: 0, files: 0 }
        );
    }

    #[test]
    fn test_minify_applies_to_scripts_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "style.css", "  p{}  ");
        let entry = create_test_file(root, "index.js", "  import './style.css';  ");

        let minifier = Arc::new(TrimMinifier::default());
        let options = Options {
            minify: true,
            categories: vec![Category::Script, Category::Css],
            ..Options::default()
        };
        let report =
            run_with_toolchain(&entry, &options, toolchain(minifier.clone()), &CategoryTable::default())
                .unwrap();

        assert_eq!(report.size_of(Category::Script), Some("import './style.css';".len() as u64));
        assert_eq!(report.size_of(Category::Css), Some(7));
        assert_eq!(minifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_exclude_node_modules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "node_modules/lib/package.json", r#"{ "main": "main.js" }"#);
        create_test_file(root, "node_modules/lib/main.js", "\"lib\";");
        let entry = create_test_file(root, "index.js", "import 'lib';");

        let tc = toolchain(Arc::new(TrimMinifier::default()));
        let table = CategoryTable::default();

        let with = run_with_toolchain(&entry, &Options::default(), Arc::clone(&tc), &table).unwrap();
        assert_eq!(with.size_of(Category::Script), Some(("import 'lib';".len() + 6) as u64));

        let options = Options { include_node_modules: false, ..Options::default() };
        let without = run_with_toolchain(&entry, &options, tc, &table).unwrap();
        assert_eq!(without.size_of(Category::Script), Some("import 'lib';".len() as u64));
        assert_eq!(without.sizes[0].files, 1);
        assert_eq!(without.files_traced, 2);
    }

    #[test]
    fn test_custom_table() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "view.jsx", "x;");
        let entry = create_test_file(root, "index.js", "import './view.jsx';");

        let table = CategoryTable::default().with_suffixes(Category::Script, ["js", "jsx"]);
        let report = run_with_toolchain(
            &entry,
            &Options::default(),
            toolchain(Arc::new(TrimMinifier::default())),
            &table,
        )
        .unwrap();
        assert_eq!(report.sizes[0].files, 2);
    }

    #[test]
    fn test_unresolved_import_fails_run() {
        let temp_dir = TempDir::new().unwrap();
        let entry = create_test_file(temp_dir.path(), "index.js", "import './missing';");

        let err = run_with_toolchain(
            &entry,
            &Options::default(),
            toolchain(Arc::new(TrimMinifier::default())),
            &CategoryTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SizeError::Trace(_)));
    }
}
