//! Job payloads and the results executors derive from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ExecutorId;

/// An opaque unit of work for the pool.
///
/// Immutable once created; the queue owns it until exactly one executor
/// claims it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Job(String);

impl Job {
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    #[must_use]
    pub fn payload(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_payload(self) -> String {
        self.0
    }
}

impl From<String> for Job {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Job {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The outcome of one job, tagged with the executor that produced it.
///
/// Renders as `worker-<id> processed <payload>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobResult {
    executor: ExecutorId,
    payload: String,
}

impl JobResult {
    /// Derive the result for `job` as processed by `executor`.
    #[must_use]
    pub fn new(executor: ExecutorId, job: Job) -> Self {
        Self {
            executor,
            payload: job.into_payload(),
        }
    }

    #[must_use]
    pub fn executor(&self) -> ExecutorId {
        self.executor
    }

    /// The original job payload, with the executor tag stripped.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed {}", self.executor, self.payload)
    }
}

impl From<JobResult> for String {
    fn from(value: JobResult) -> Self {
        value.to_string()
    }
}
