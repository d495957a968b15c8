use super::JoinHandle;
use super::waker::TaskWaker;
use crate::runtime::context::CURRENT_EXECUTOR;
use crate::runtime::executor::queue::ReadyQueueHandle;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, type-erased task future.
pub(crate) type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// A spawned task as stored by the executor.
pub(crate) struct Task {
    /// `None` while the executor is polling it.
    future: Option<LocalFuture>,
    waker: Arc<TaskWaker>,
}

impl Task {
    pub(crate) fn new(id: usize, future: LocalFuture, queue: ReadyQueueHandle) -> Self {
        Self {
            future: Some(future),
            waker: TaskWaker::new(id, queue),
        }
    }

    /// Takes the future out for polling if the task was actually woken.
    ///
    /// A queue entry may be stale (the id was reused, or a duplicate was
    /// left behind), in which case the scheduled flag is already clear and
    /// the task is skipped.
    pub(crate) fn claim(&mut self) -> Option<(LocalFuture, Arc<TaskWaker>)> {
        if !self.waker.take_scheduled() {
            return None;
        }

        self.future
            .take()
            .map(|future| (future, self.waker.clone()))
    }

    pub(crate) fn restore(&mut self, future: LocalFuture) {
        self.future = Some(future);
    }
}

/// Spawns a future as a task onto the current runtime.
///
/// The task starts on the next executor turn and runs to completion even
/// if the returned [`JoinHandle`] is dropped.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let handle = task::spawn(async { 40 + 2 });
/// assert_eq!(handle.await, 42);
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + 'static,
    F::Output: 'static,
{
    CURRENT_EXECUTOR.with(|cell| {
        let binding = cell.borrow();
        let executor = binding
            .as_ref()
            .expect("spawn must be called within the context of a runtime");

        executor.spawn(future)
    })
}
