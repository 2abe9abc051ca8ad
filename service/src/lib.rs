//! Service boundary for Corral.
//!
//! Decodes inbound payloads, enforces the batch cap and the optional request
//! deadline, and hands the work to the concurrency core. Nothing in the core
//! runs until a payload has decoded cleanly, so malformed input never touches
//! core state.

mod error;
pub mod wire;

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;

use corral_config::CorralConfig;
use corral_core::{ConfinementActor, ResultStore, WorkerPool};
use corral_types::{Job, JobResult, StoreMode};

pub use error::BoundaryError;
pub use wire::{ConfinedRequest, ProcessRequest, ProcessResponse};

const ROOT_GREETING: &str = "Hello World Openshift!";

/// The running service: one confinement actor and one worker pool.
///
/// Construction IS startup. The actor is running before `start` returns, so
/// there is no window in which a request can reach an actor that is not
/// listening.
#[derive(Debug)]
pub struct Service {
    actor: ConfinementActor,
    pool: WorkerPool,
    /// Present only in cumulative mode.
    shared_store: Option<ResultStore>,
    max_batch_size: usize,
    request_timeout: Option<Duration>,
    status_delay: Duration,
}

impl Service {
    /// Start the service from a loaded configuration.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(config: &CorralConfig) -> Self {
        let pool = WorkerPool::new(config.pool_size()).with_work_delay(config.work_delay());
        let shared_store = match config.store_mode() {
            StoreMode::PerBatch => None,
            StoreMode::Cumulative => Some(ResultStore::new()),
        };

        tracing::info!(
            pool_size = %pool.size(),
            store = config.store_mode().as_str(),
            max_batch_size = config.max_batch_size(),
            "Starting service"
        );

        Self {
            actor: ConfinementActor::start(),
            pool,
            shared_store,
            max_batch_size: config.max_batch_size(),
            request_timeout: config.request_timeout(),
            status_delay: config.status_delay(),
        }
    }

    /// Single-item submit. Returns the actor's reply as the full body.
    pub async fn handle_confined(&self, body: &[u8]) -> Result<String, BoundaryError> {
        let request: ConfinedRequest = decode(body)?;
        self.with_deadline(self.submit(request.data)).await
    }

    /// Batch submit. Fans the jobs out over the pool and returns every result.
    pub async fn handle_process(&self, body: &[u8]) -> Result<ProcessResponse, BoundaryError> {
        let request: ProcessRequest = decode(body)?;
        if request.len() > self.max_batch_size {
            tracing::warn!(
                len = request.len(),
                max = self.max_batch_size,
                "Rejected oversized batch"
            );
            return Err(BoundaryError::BatchTooLarge {
                len: request.len(),
                max: self.max_batch_size,
            });
        }

        let results = self
            .with_deadline(self.run_batch(request.into_jobs()))
            .await?;

        Ok(ProcessResponse {
            processed: results.into_iter().map(String::from).collect(),
        })
    }

    /// Greeting for an arbitrary path; the empty path gets the root greeting.
    #[must_use]
    pub fn greet(&self, path: &str) -> String {
        if path.is_empty() {
            ROOT_GREETING.to_string()
        } else {
            format!("Hello, {path}!")
        }
    }

    /// Status probe. The status word comes from a helper task over a one-shot
    /// channel, after the configured delay.
    pub async fn status(&self) -> Result<String, BoundaryError> {
        let (tx, rx) = oneshot::channel();
        let delay = self.status_delay;
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let _ = tx.send("OK");
        });

        let status = self
            .with_deadline(async { rx.await.map_err(|_| BoundaryError::Unavailable) })
            .await?;
        Ok(format!("System status: {status}"))
    }

    /// Whether the service can take single-item submits.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.actor.handle().is_available()
    }

    /// Stop the actor and return its log in processing order.
    ///
    /// Requests already admitted are answered first; later ones fail with
    /// [`BoundaryError::Unavailable`].
    pub async fn shutdown(self) -> Result<Vec<String>, BoundaryError> {
        tracing::info!("Shutting down service");
        Ok(self.actor.shutdown().await?)
    }

    async fn submit(&self, data: String) -> Result<String, BoundaryError> {
        Ok(self.actor.submit(data).await?)
    }

    async fn run_batch(&self, jobs: Vec<Job>) -> Result<Vec<JobResult>, BoundaryError> {
        match &self.shared_store {
            Some(store) => {
                self.pool.process_batch_into(jobs, store).await?;
                Ok(store.snapshot())
            }
            None => Ok(self.pool.process_batch(jobs).await?),
        }
    }

    async fn with_deadline<T>(
        &self,
        fut: impl Future<Output = Result<T, BoundaryError>>,
    ) -> Result<T, BoundaryError> {
        let Some(limit) = self.request_timeout else {
            return fut.await;
        };
        if let Ok(outcome) = tokio::time::timeout(limit, fut).await {
            outcome
        } else {
            // The abandoned work may still complete with nobody observing it.
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Request timed out");
            Err(BoundaryError::Timeout(limit))
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, BoundaryError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected undecodable payload");
        BoundaryError::Decode(e)
    })
}
