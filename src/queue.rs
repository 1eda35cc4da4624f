//! Modification Queue.
//!
//! Serializes every peer-connection-mutating operation: at most one task is
//! "in flight" (between being handed its `done` callback and that callback
//! firing) at any instant; further submissions wait FIFO. A task is opaque
//! to the queue — it is handed a `done` callback and must eventually invoke
//! it, exactly once, with `None` (success) or `Some(error)` (failure).
//! Failure does not drain the queue: the next task still runs.
//!
//! `done` may fire from any thread (the peer connection's own completion
//! callback commonly runs off a different executor thread than the one that
//! called `enqueue`), so the queue synchronizes with a plain [`Mutex`]
//! rather than assuming single-thread reentrancy.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::JingleError;
use crate::log::log_sink::LogSink;
use crate::sink_warn;

/// A queued unit of work: receives a `done` callback it must invoke exactly
/// once.
pub type Task = Box<dyn FnOnce(DoneFn) + Send>;
/// Invoked by a running task to report completion.
pub type DoneFn = Box<dyn FnOnce(Option<JingleError>) + Send>;
/// Invoked by the queue once a task's `done` fires, with that task's result.
pub type Completion = Box<dyn FnOnce(Option<JingleError>) + Send>;

struct QueuedTask {
    work: Task,
    completion: Option<Completion>,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<QueuedTask>,
    running: bool,
}

struct Inner {
    state: Mutex<QueueState>,
    logger: Arc<dyn LogSink>,
}

/// Single-concurrency FIFO task queue. Cheaply cloneable; all clones share
/// the same underlying state.
#[derive(Clone)]
pub struct ModificationQueue {
    inner: Arc<Inner>,
}

impl ModificationQueue {
    #[must_use]
    pub fn new(logger: Arc<dyn LogSink>) -> Self {
        Self { inner: Arc::new(Inner { state: Mutex::new(QueueState::default()), logger }) }
    }

    /// Submit a task. `completion`, if given, is invoked exactly once after
    /// `work`'s `done` callback fires, with that task's result.
    pub fn enqueue(&self, work: Task, completion: Option<Completion>) {
        let should_start = {
            let mut state = self.lock();
            state.pending.push_back(QueuedTask { work, completion });
            let idle = !state.running;
            if idle {
                state.running = true;
            }
            idle
        };
        if should_start {
            self.run_next();
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.lock();
        !state.running && state.pending.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.inner.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn run_next(&self) {
        let next = {
            let mut state = self.lock();
            match state.pending.pop_front() {
                Some(task) => Some(task),
                None => {
                    state.running = false;
                    None
                }
            }
        };
        let Some(QueuedTask { work, completion }) = next else {
            return;
        };

        let this = self.clone();
        let logger = Arc::clone(&self.inner.logger);
        let done: DoneFn = Box::new(move |err| {
            if let Some(e) = &err {
                sink_warn!(logger, "modification queue task failed: {e}");
            }
            if let Some(completion) = completion {
                completion(err);
            }
            this.run_next();
        });
        work(done);
    }
}
