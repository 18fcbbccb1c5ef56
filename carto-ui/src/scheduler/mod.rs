use crate::error::{Result, SyncError};
use crate::layer::ImageBinding;
use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Shared scheduler wrapper for hosts that hand it to several synchronizers
pub type SharedScheduler = Rc<RefCell<Scheduler>>;

/// Drives image bindings on the host's thread
///
/// Bindings are polled from [`Scheduler::tick`], which the embedding event
/// loop calls once per frame (or whenever image loads may have settled).
/// Failures are collected rather than dropped so the host can report them.
pub struct Scheduler {
    pool: LocalPool,
    spawner: LocalSpawner,
    pending: Rc<Cell<usize>>,
    failures: Rc<RefCell<Vec<SyncError>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool,
            spawner,
            pending: Rc::new(Cell::new(0)),
            failures: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn shared() -> SharedScheduler {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Queue a binding; it makes progress on the next [`Scheduler::tick`]
    pub fn spawn(&self, binding: ImageBinding) -> Result<()> {
        let pending = Rc::clone(&self.pending);
        let failures = Rc::clone(&self.failures);
        tracing::trace!(layer = binding.layer_id(), url = binding.url(), "binding scheduled");

        pending.set(pending.get() + 1);
        let spawned = self.spawner.spawn_local(async move {
            let result = binding.await;
            pending.set(pending.get() - 1);
            if let Err(e) = result {
                failures.borrow_mut().push(e);
            }
        });
        if spawned.is_err() {
            self.pending.set(self.pending.get() - 1);
        }
        spawned.map_err(SyncError::from)
    }

    /// Poll every queued binding until none can progress, returning new failures
    pub fn tick(&mut self) -> Vec<SyncError> {
        self.pool.run_until_stalled();
        let failures: Vec<SyncError> = self.failures.borrow_mut().drain(..).collect();
        if !failures.is_empty() {
            tracing::debug!(count = failures.len(), "image bindings failed");
        }
        failures
    }

    /// Bindings spawned but not yet finished
    pub fn pending_count(&self) -> usize {
        self.pending.get()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending.get())
            .field("failures", &self.failures.borrow().len())
            .finish_non_exhaustive()
    }
}
