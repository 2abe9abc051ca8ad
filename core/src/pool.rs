//! Worker pool: fan jobs out to a fixed set of executors, fan results back in.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use corral_types::{ExecutorId, Job, JobResult, PoolSize};

use crate::store::ResultStore;

/// Simulated processing time per job.
pub const DEFAULT_WORK_DELAY: Duration = Duration::from_millis(100);

/// Shared receiving end of the job queue. Holding the lock is what makes a
/// claim exclusive.
type JobQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

#[derive(Debug, Error)]
pub enum PoolError {
    /// An executor task ended abnormally; jobs it had claimed have no result.
    #[error("{executor} terminated abnormally: {reason}")]
    ExecutorFailed { executor: ExecutorId, reason: String },
}

/// A fixed-size pool of executors.
///
/// The pool itself is stateless between batches: every call to
/// [`WorkerPool::process_batch_into`] spawns `size` executors and joins them
/// all before returning.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: PoolSize,
    work_delay: Duration,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(PoolSize::default())
    }
}

impl WorkerPool {
    #[must_use]
    pub fn new(size: PoolSize) -> Self {
        Self {
            size,
            work_delay: DEFAULT_WORK_DELAY,
        }
    }

    #[must_use]
    pub fn with_work_delay(mut self, work_delay: Duration) -> Self {
        self.work_delay = work_delay;
        self
    }

    #[must_use]
    pub fn size(&self) -> PoolSize {
        self.size
    }

    #[must_use]
    pub fn work_delay(&self) -> Duration {
        self.work_delay
    }

    /// Process `jobs` against a fresh store and return its contents.
    pub async fn process_batch(&self, jobs: Vec<Job>) -> Result<Vec<JobResult>, PoolError> {
        let store = ResultStore::new();
        self.process_batch_into(jobs, &store).await?;
        Ok(store.snapshot())
    }

    /// Process `jobs`, appending one result per job into `store`.
    ///
    /// Returns once every executor has exited, i.e. once the queue is closed
    /// and drained. Results already in `store` are left alone, so passing the
    /// same store across batches accumulates.
    pub async fn process_batch_into(
        &self,
        jobs: Vec<Job>,
        store: &ResultStore,
    ) -> Result<(), PoolError> {
        let started = Instant::now();
        let job_count = jobs.len();

        // Sized for the whole batch so the producer never waits on executors.
        let (tx, rx) = mpsc::channel::<Job>(job_count.max(1));
        let queue: JobQueue = Arc::new(Mutex::new(rx));

        let executors: Vec<(ExecutorId, JoinHandle<usize>)> = self
            .size
            .executors()
            .map(|id| {
                let handle = tokio::spawn(run_executor(
                    id,
                    Arc::clone(&queue),
                    store.clone(),
                    self.work_delay,
                ));
                (id, handle)
            })
            .collect();

        for job in jobs {
            if tx.send(job).await.is_err() {
                // Every executor is gone; the join below reports why.
                tracing::warn!("Job queue closed before all jobs were enqueued");
                break;
            }
        }
        // Closing is one-way: executors exit once the remaining jobs drain.
        drop(tx);

        let (ids, handles): (Vec<ExecutorId>, Vec<JoinHandle<usize>>) =
            executors.into_iter().unzip();
        let outcomes = join_all(handles).await;

        let mut failure = None;
        for (executor, outcome) in ids.into_iter().zip(outcomes) {
            if let Err(e) = outcome {
                tracing::warn!(%executor, error = %e, "Executor failed");
                if failure.is_none() {
                    failure = Some(PoolError::ExecutorFailed {
                        executor,
                        reason: e.to_string(),
                    });
                }
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        tracing::info!(
            jobs = job_count,
            pool_size = %self.size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch processed"
        );
        Ok(())
    }
}

/// Claim jobs until the queue is closed and empty. Returns how many this
/// executor processed.
async fn run_executor(
    id: ExecutorId,
    queue: JobQueue,
    store: ResultStore,
    work_delay: Duration,
) -> usize {
    tracing::debug!(executor = %id, "Executor started");
    let mut processed = 0;
    loop {
        // Release the queue before doing the work so other executors can claim.
        let next = queue.lock().await.recv().await;
        let Some(job) = next else { break };

        if !work_delay.is_zero() {
            tokio::time::sleep(work_delay).await;
        }
        store.append(JobResult::new(id, job));
        processed += 1;
    }
    tracing::debug!(executor = %id, processed, "Executor exited");
    processed
}
