use std::sync::{
    OnceLock,
    atomic::{AtomicBool, Ordering},
};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoState {
    NotStarted,
    InProgress,
    Completed,
}

/// Single-assignment cell holding the outcome of one computation.
///
/// The first caller runs the computation; callers arriving while it runs
/// block until it finishes, then everyone sees the same value or the same
/// error. Failures are cached like values.
#[derive(Debug)]
pub struct Memo<T> {
    started: AtomicBool,
    cell: OnceLock<Result<T>>,
}

impl<T: Clone> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Self {
        Self { started: AtomicBool::new(false), cell: OnceLock::new() }
    }

    pub fn get_or_compute(&self, compute: impl FnOnce() -> Result<T>) -> Result<T> {
        self.cell
            .get_or_init(|| {
                self.started.store(true, Ordering::Release);
                compute()
            })
            .clone()
    }

    pub fn state(&self) -> MemoState {
        if self.cell.get().is_some() {
            MemoState::Completed
        } else if self.started.load(Ordering::Acquire) {
            MemoState::InProgress
        } else {
            MemoState::NotStarted
        }
    }
}
