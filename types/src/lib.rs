//! Core domain types for Corral.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod ids;
mod job;

pub use ids::ExecutorId;
pub use job::{Job, JobResult};

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix the confinement actor puts in front of every reply.
pub const CONFINED_REPLY_PREFIX: &str = "confined processed: ";

// ============================================================================
// Pool Size
// ============================================================================

/// Number of executors a pool spawns per batch.
///
/// Zero executors would never drain the queue, so zero is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PoolSize(NonZeroUsize);

#[derive(Debug, Error)]
#[error("pool size must be at least 1")]
pub struct PoolSizeError;

impl PoolSize {
    /// Executor count used by the batch endpoint.
    pub const DEFAULT: Self = Self(NonZeroUsize::MIN.saturating_add(2));

    pub fn new(value: usize) -> Result<Self, PoolSizeError> {
        NonZeroUsize::new(value).map(Self).ok_or(PoolSizeError)
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Executor identities for this pool, 1-based.
    pub fn executors(self) -> impl Iterator<Item = ExecutorId> {
        (1..=self.get()).map(ExecutorId::new)
    }
}

impl Default for PoolSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for PoolSize {
    type Error = PoolSizeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PoolSize> for usize {
    fn from(value: PoolSize) -> Self {
        value.get()
    }
}

impl fmt::Display for PoolSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Store Mode
// ============================================================================

/// What happens to batch results between batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
    /// Every batch gets a fresh store; responses contain only that batch.
    #[default]
    PerBatch,
    /// One store lives across batches; responses contain everything so far.
    Cumulative,
}

impl StoreMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerBatch => "per_batch",
            Self::Cumulative => "cumulative",
        }
    }
}

/// Render the actor's reply for one submitted payload.
#[must_use]
pub fn confined_reply(data: &str) -> String {
    format!("{CONFINED_REPLY_PREFIX}{data}")
}
