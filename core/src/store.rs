//! Result store shared by pool executors.

use std::sync::{Arc, Mutex, PoisonError};

use corral_types::JobResult;

/// Append-only, mutex-guarded sequence of job results.
///
/// Cloning yields another handle onto the same sequence, which is how
/// executors share it. Appends are atomic; ordering among concurrent
/// appenders is whatever order they acquire the lock in.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    results: Arc<Mutex<Vec<JobResult>>>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, result: JobResult) {
        let mut results = self
            .results
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        results.push(result);
    }

    /// Copy of the current sequence.
    ///
    /// Only meaningful once every appender has finished; the store does not
    /// enforce that, the pool's join does.
    #[must_use]
    pub fn snapshot(&self) -> Vec<JobResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything accumulated so far.
    pub fn reset(&self) {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
