use dashmap::DashMap;
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    error::TraceError,
    types::{SpecKind, Specifier},
};

pub fn imports_for(
    file: &Path,
    cache: &DashMap<PathBuf, Vec<Specifier>>,
) -> Result<Vec<Specifier>, TraceError> {
    let file_buf = file.to_path_buf();
    if let Some(v) = cache.get(&file_buf) {
        trace!("Cache hit for imports: {}", file.display());
        return Ok(v.clone());
    }
    trace!("Parsing file for imports: {}", file.display());
    let src = fs::read_to_string(file)
        .map_err(|e| TraceError::Io { path: file_buf.clone(), source: Arc::new(e) })?;

    let st = source_type_for(file);
    let allocator = Allocator::default();
    let ParserReturn { program, .. } = OxcParser::new(&allocator, &src, st).parse();

    let mut collector = ImportCollector { file, specs: Vec::new() };
    collector.visit_program(&program);
    let specs = collector.specs;

    debug!("Found {} import specifiers in {}", specs.len(), file.display());
    cache.insert(file_buf, specs.clone());
    Ok(specs)
}

/// Collects import requests from anywhere in a module, in source order.
struct ImportCollector<'f> {
    file: &'f Path,
    specs: Vec<Specifier>,
}

impl ImportCollector<'_> {
    fn push(&mut self, request: &str, kind: SpecKind) {
        trace!("Found {:?} import: '{}' in {}", kind, request, self.file.display());
        self.specs.push(Specifier { request: request.to_string(), kind });
    }
}

impl<'a> Visit<'a> for ImportCollector<'_> {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        // import type { Foo } from 'bar'
        if decl.import_kind.is_type() {
            trace!("Skipping type-only import declaration in {}", self.file.display());
            return;
        }

        // A declaration whose every specifier is `type` is erased by transpilation
        let has_runtime_import = match &decl.specifiers {
            Some(specifiers) => {
                specifiers.is_empty()
                    || specifiers.iter().any(|spec| match spec {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => !s.import_kind.is_type(),
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => true,
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => true,
                    })
            }
            // import 'side-effect'
            None => true,
        };
        if has_runtime_import {
            self.push(&decl.source.value, SpecKind::Static);
        }
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        if !decl.export_kind.is_type() {
            self.push(&decl.source.value, SpecKind::Static);
        }
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if decl.export_kind.is_type() {
            return;
        }
        if let Some(source) = &decl.source {
            self.push(&source.value, SpecKind::Static);
        }
        // export const x = require('./x')
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_call_expression(&mut self, ce: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &ce.callee
            && callee.name.as_str() == "require"
            && let Some(Expression::StringLiteral(sl)) =
                ce.arguments.first().and_then(Argument::as_expression)
        {
            self.push(&sl.value, SpecKind::Static);
        }
        // loadConfig(require('./config'))
        walk::walk_call_expression(self, ce);
    }

    fn visit_import_expression(&mut self, ie: &ImportExpression<'a>) {
        if let Expression::StringLiteral(sl) = &ie.source {
            self.push(&sl.value, SpecKind::Dynamic);
        }
        walk::walk_import_expression(self, ie);
    }
}

/// Source type used to parse `path`, picked from its extension.
pub fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
    let ext = ext.as_deref();

    let mut st = SourceType::default()
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")));

    if matches!(ext, Some("mjs") | Some("mts")) {
        st = st.with_module(true);
    }

    st
}
