//! Concurrency core for Corral.
//!
//! Two coordination patterns live here:
//!
//! - [`ConfinementActor`]: a single task that owns a private log and serves
//!   submissions one at a time over a channel. No locks; the log never leaves
//!   the task while it runs.
//! - [`WorkerPool`]: a fixed set of executors draining a shared job queue and
//!   appending into a [`ResultStore`], joined before the batch returns.
//!
//! ```text
//! submit(data) --Request{data, oneshot}--> [actor task] --reply--> caller
//!
//! jobs --> queue --+--> worker-1 --+
//!                  +--> worker-2 --+--> ResultStore --(join all)--> snapshot
//!                  +--> worker-N --+
//! ```

mod actor;
mod pool;
mod store;

pub use actor::{ActorError, ActorHandle, ConfinementActor};
pub use pool::{DEFAULT_WORK_DELAY, PoolError, WorkerPool};
pub use store::ResultStore;
