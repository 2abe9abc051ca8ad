use std::fmt;

/// Stable identity of one pool executor: its 1-based ordinal within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ExecutorId(usize);

impl ExecutorId {
    #[must_use]
    pub fn new(ordinal: usize) -> Self {
        Self(ordinal)
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for ExecutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}
