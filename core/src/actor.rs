//! Confinement actor: one task owns the submission log outright.
//!
//! Callers never touch the log. They send a request carrying a one-shot reply
//! sender and wait on it; the actor task appends, replies, and moves on. The
//! request channel has room for a single message, so a caller whose request
//! cannot be admitted waits at the send.
//!
//! # Shutdown
//!
//! [`ConfinementActor::shutdown`] enqueues a shutdown command behind any
//! requests already admitted. Those are served; the channel is then closed,
//! and anything that arrives later fails with [`ActorError::Unavailable`]
//! instead of hanging. The log is handed back to the caller of `shutdown`
//! once the task has ended.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use corral_types::confined_reply;

const REQUEST_CHANNEL_CAPACITY: usize = 1;

enum ActorCommand {
    Submit {
        data: String,
        reply: oneshot::Sender<String>,
    },
    Shutdown,
}

#[derive(Debug, Error)]
pub enum ActorError {
    /// The actor has shut down (or is shutting down) and will not answer.
    #[error("confinement actor is unavailable")]
    Unavailable,
    #[error("confinement actor task failed: {0}")]
    Crashed(String),
}

/// Cloneable sending side of the actor. Every clone talks to the same task.
#[derive(Debug, Clone)]
pub struct ActorHandle {
    tx: mpsc::Sender<ActorCommand>,
}

impl ActorHandle {
    /// Submit `data` and wait for the actor's reply.
    pub async fn submit(&self, data: impl Into<String>) -> Result<String, ActorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ActorCommand::Submit {
                data: data.into(),
                reply,
            })
            .await
            .map_err(|_| ActorError::Unavailable)?;

        // A dropped reply sender means the request was refused during shutdown.
        rx.await.map_err(|_| ActorError::Unavailable)
    }

    /// Whether the actor still accepts requests.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// The running actor: its task plus a handle for talking to it.
///
/// Construction is start: the task is running by the time `start` returns, so
/// no request can be sent to an actor that was never started.
#[derive(Debug)]
pub struct ConfinementActor {
    handle: ActorHandle,
    task: JoinHandle<Vec<String>>,
}

impl ConfinementActor {
    /// Spawn the actor task on the current tokio runtime.
    #[must_use]
    pub fn start() -> Self {
        let (tx, rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let task = tokio::spawn(run(rx));
        tracing::info!("Confinement actor started");
        Self {
            handle: ActorHandle { tx },
            task,
        }
    }

    #[must_use]
    pub fn handle(&self) -> ActorHandle {
        self.handle.clone()
    }

    pub async fn submit(&self, data: impl Into<String>) -> Result<String, ActorError> {
        self.handle.submit(data).await
    }

    /// Stop the actor and take back its log.
    ///
    /// Requests admitted before this call are answered first. Returns the
    /// log in processing order.
    pub async fn shutdown(self) -> Result<Vec<String>, ActorError> {
        // If the task already ended the send fails; joining still yields the log.
        let _ = self.handle.tx.send(ActorCommand::Shutdown).await;
        drop(self.handle);

        let log = self
            .task
            .await
            .map_err(|e| ActorError::Crashed(e.to_string()))?;
        tracing::info!(entries = log.len(), "Confinement actor stopped");
        Ok(log)
    }
}

/// The actor loop. `log` is local to this future and is only ever returned
/// once the loop has ended.
async fn run(mut rx: mpsc::Receiver<ActorCommand>) -> Vec<String> {
    let mut log: Vec<String> = Vec::new();

    while let Some(command) = rx.recv().await {
        match command {
            ActorCommand::Submit { data, reply } => {
                let response = confined_reply(&data);
                log.push(data);
                if reply.send(response).is_err() {
                    tracing::trace!("Submitter went away before its reply was sent");
                }
            }
            ActorCommand::Shutdown => break,
        }
    }

    rx.close();
    let mut refused = 0usize;
    while let Ok(command) = rx.try_recv() {
        // Dropping the reply sender wakes the caller with `Unavailable`.
        drop(command);
        refused += 1;
    }
    if refused > 0 {
        tracing::debug!(refused, "Refused requests queued behind shutdown");
    }

    log
}
