use crate::runtime::executor::queue::ReadyQueueHandle;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::Wake;

/// Waker of a runtime task.
///
/// Waking pushes the task id onto the ready queue. The `scheduled` flag
/// collapses repeated wake-ups between two polls into a single queue
/// entry: it is set by the first wake and cleared right before the task
/// is polled again.
///
/// The waker only carries an id and an `Arc` to the queue, so it is
/// `Send + Sync` even though the task it designates is not.
pub(crate) struct TaskWaker {
    id: usize,
    scheduled: AtomicBool,
    queue: ReadyQueueHandle,
}

impl TaskWaker {
    /// Creates the waker of a freshly spawned (and already queued) task.
    pub(crate) fn new(id: usize, queue: ReadyQueueHandle) -> Arc<Self> {
        Arc::new(Self {
            id,
            scheduled: AtomicBool::new(true),
            queue,
        })
    }

    /// Clears the scheduled flag, returning whether it was set.
    ///
    /// Called by the executor right before polling the task, so that any
    /// wake-up during the poll schedules it again.
    pub(crate) fn take_scheduled(&self) -> bool {
        self.scheduled.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn is_scheduled(&self) -> bool {
        self.scheduled.load(Ordering::Acquire)
    }
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        if !self.scheduled.swap(true, Ordering::AcqRel) {
            self.queue.push(self.id);
        }
    }
}
