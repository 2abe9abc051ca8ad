use std::time::Duration;

use thiserror::Error;

use corral_core::{ActorError, PoolError};

/// Everything a boundary call can fail with.
///
/// Decoding and limit errors are raised before the core is touched.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("invalid input: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("batch of {len} jobs exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },
    #[error("service unavailable")]
    Unavailable,
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl BoundaryError {
    /// HTTP-style status class for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Decode(_) => 400,
            Self::BatchTooLarge { .. } => 413,
            Self::Unavailable => 503,
            Self::Timeout(_) => 504,
            Self::Pool(_) => 500,
        }
    }

    /// Whether the caller sent something it should not have.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<ActorError> for BoundaryError {
    fn from(err: ActorError) -> Self {
        match err {
            ActorError::Unavailable => Self::Unavailable,
            ActorError::Crashed(reason) => {
                tracing::warn!(%reason, "Confinement actor crashed");
                Self::Unavailable
            }
        }
    }
}
