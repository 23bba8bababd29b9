//! # Deferred Task Queue
//!
//! FIFO of closures waiting to run on the render thread.
//!
//! ```text
//!   Thread 1 ──┐
//!   Thread 2 ──┼──> [EventQueue] ──take_all──> [Render Thread]
//!   Thread N ──┘   (behind the surface lock)     (runs batch unlocked)
//! ```
//!
//! The queue itself carries no lock: it lives inside the scheduler state and
//! is only touched while that state's mutex is held. `take_all` swaps the
//! whole backlog out in O(1) so the render thread can run the batch after
//! releasing the lock. Anything pushed while a batch runs lands in the next
//! batch.

use std::collections::VecDeque;

/// A unit of work submitted through `queue_event`.
pub type DeferredTask = Box<dyn FnOnce() + Send + 'static>;

/// Pending deferred tasks.
#[derive(Default)]
pub struct EventQueue {
    tasks: VecDeque<DeferredTask>,
    closed: bool,
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.tasks.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl EventQueue {
    /// Creates an empty, open queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task. A closed queue hands the task back.
    pub fn push(&mut self, task: DeferredTask) -> Result<(), DeferredTask> {
        if self.closed {
            return Err(task);
        }
        self.tasks.push_back(task);
        Ok(())
    }

    /// Removes the whole backlog, oldest first.
    #[must_use]
    pub fn take_all(&mut self) -> TaskBatch {
        TaskBatch {
            tasks: std::mem::take(&mut self.tasks),
        }
    }

    /// Rejects all further pushes. Tasks already queued stay queued.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of tasks waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no task is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// A drained backlog, run outside the lock.
#[must_use = "a batch that is dropped discards its tasks"]
pub struct TaskBatch {
    tasks: VecDeque<DeferredTask>,
}

impl TaskBatch {
    /// Runs every task in submission order. Returns how many ran.
    pub fn run(self) -> usize {
        let count = self.tasks.len();
        for task in self.tasks {
            task();
        }
        count
    }

    /// Number of tasks in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the batch holds no task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
