//! Payload shapes accepted and produced at the boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use corral_types::Job;

/// Body of a single-item submit: `{"data": "..."}`.
///
/// A missing `data` field decodes as the empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfinedRequest {
    #[serde(default)]
    pub data: String,
}

/// Body of a batch submit: a JSON array of strings. `null` is an empty batch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProcessRequest {
    jobs: Option<Vec<Job>>,
}

impl ProcessRequest {
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs.unwrap_or_default()
    }
}

/// Response of a batch submit: `{"processed": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub processed: Vec<String>,
}

/// Renders as the JSON response body.
impl fmt::Display for ProcessResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&body)
    }
}
