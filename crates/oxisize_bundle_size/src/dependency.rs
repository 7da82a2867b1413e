use log::trace;
use oxisize_core::FileRecord;
use rayon::prelude::*;
use std::sync::Arc;

use crate::{
    engine::OxcMinifier,
    error::Result,
    memo::{Memo, MemoState},
    minify::{CompilationLevel, Minify},
    transpile::Transpilers,
};

/// Engines shared by every dependency of one run.
pub struct Toolchain {
    pub transpilers: Transpilers,
    pub minifier: Arc<dyn Minify>,
}

impl Toolchain {
    pub fn new(transpilers: Transpilers, minifier: Arc<dyn Minify>) -> Self {
        Self { transpilers, minifier }
    }

    pub fn oxc(level: CompilationLevel) -> Self {
        Self::new(Transpilers::oxc(), Arc::new(OxcMinifier::new(level)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Raw,
    Min,
}

/// A traced file with its transpiled (`raw`) and minified (`min`) text,
/// each computed on first access and cached for the life of the value.
pub struct Dependency {
    record: FileRecord,
    toolchain: Arc<Toolchain>,
    raw: Memo<Arc<str>>,
    min: Memo<Arc<str>>,
}

impl Dependency {
    pub fn new(record: FileRecord, toolchain: Arc<Toolchain>) -> Self {
        Self { record, toolchain, raw: Memo::new(), min: Memo::new() }
    }

    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    pub fn raw(&self) -> Result<Arc<str>> {
        self.raw.get_or_compute(|| {
            trace!("Transpiling {}", self.record.resolved_path.display());
            self.toolchain.transpilers.transpile(&self.record).map(Arc::from)
        })
    }

    pub fn min(&self) -> Result<Arc<str>> {
        self.min.get_or_compute(|| {
            let raw = self.raw()?;
            trace!("Minifying {}", self.record.resolved_path.display());
            self.toolchain.minifier.minify(&raw, &self.record.resolved_path).map(Arc::from)
        })
    }

    pub fn view(&self, view: View) -> Result<Arc<str>> {
        match view {
            View::Raw => self.raw(),
            View::Min => self.min(),
        }
    }

    pub fn state(&self, view: View) -> MemoState {
        match view {
            View::Raw => self.raw.state(),
            View::Min => self.min.state(),
        }
    }
}

/// Computes `view` for every dependency in parallel. The result keeps the
/// input order and is only returned once every view is ready.
pub fn views(deps: &[&Dependency], view: View) -> Result<Vec<Arc<str>>> {
    deps.par_iter().map(|d| d.view(view)).collect()
}

pub fn raw_views(deps: &[Dependency]) -> Result<Vec<Arc<str>>> {
    views(&deps.iter().collect::<Vec<_>>(), View::Raw)
}

pub fn min_views(deps: &[Dependency]) -> Result<Vec<Arc<str>>> {
    views(&deps.iter().collect::<Vec<_>>(), View::Min)
}
