use super::queue::{ReadyQueue, ReadyQueueHandle};
use crate::runtime::task::handle::JoinState;
use crate::runtime::task::{JoinHandle, Task};
use crate::utils::Slab;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

/// Shared handle to the executor of the current runtime.
pub(crate) type ExecutorHandle = Rc<Executor>;

/// Single-threaded task executor.
///
/// Tasks live in a slab owned by the runtime thread and are polled only
/// from it. The ready queue is the sole shared piece: wakers, possibly
/// running on other threads, push task ids onto it.
pub(crate) struct Executor {
    tasks: RefCell<Slab<Task>>,
    queue: ReadyQueueHandle,
}

impl Executor {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            tasks: RefCell::new(Slab::with_capacity(capacity)),
            queue: Arc::new(ReadyQueue::new()),
        }
    }

    pub(crate) fn queue(&self) -> ReadyQueueHandle {
        self.queue.clone()
    }

    /// Spawns a new task and schedules its first poll.
    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + 'static,
        F::Output: 'static,
    {
        let state = JoinState::new();
        let completion = state.clone();

        let wrapped = async move {
            let output = future.await;
            completion.borrow_mut().complete(output);
        };

        let id = {
            let mut tasks = self.tasks.borrow_mut();
            let id = tasks.next_key();
            tasks.insert(Task::new(id, Box::pin(wrapped), self.queue.clone()))
        };
        self.queue.push(id);

        JoinHandle { state }
    }

    /// Polls the tasks that are ready at the start of the call.
    ///
    /// Tasks woken while this turn runs are left for the next turn, so a
    /// task that keeps yielding cannot starve the timers. Returns the
    /// number of tasks polled.
    pub(crate) fn run_ready(&self) -> usize {
        let batch = self.queue.len();
        let mut polled = 0;

        for _ in 0..batch {
            let Some(id) = self.queue.pop() else {
                break;
            };

            // The future is taken out of the slab for the duration of the
            // poll so that the task may spawn without a double borrow.
            let claimed = self
                .tasks
                .borrow_mut()
                .get_mut(id)
                .and_then(Task::claim);

            let Some((mut future, waker)) = claimed else {
                continue;
            };

            let waker = Waker::from(waker);
            let mut cx = Context::from_waker(&waker);
            polled += 1;

            match future.as_mut().poll(&mut cx) {
                Poll::Pending => {
                    if let Some(task) = self.tasks.borrow_mut().get_mut(id) {
                        task.restore(future);
                    }
                }
                Poll::Ready(()) => {
                    self.tasks.borrow_mut().remove(id);
                }
            }
        }

        polled
    }

    pub(crate) fn has_ready(&self) -> bool {
        self.queue.len() > 0
    }

    pub(crate) fn task_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Parks the runtime thread until a task is woken or `timeout` passes.
    pub(crate) fn park(&self, timeout: Option<Duration>) {
        self.queue.park(timeout);
    }
}
