use super::context::enter_context;
use super::executor::core::{Executor, ExecutorHandle};
use super::task::JoinHandle;
use super::task::waker::TaskWaker;
use crate::reactor::{Reactor, ReactorHandle};

use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Instant;

use tracing::trace;

/// Task id carried by the waker of the future passed to `block_on`.
///
/// It never names a slab entry, so the executor skips it when it shows up
/// in the ready queue; it only serves to unpark the event loop.
const MAIN_TASK: usize = usize::MAX;

/// The main runtime handle.
///
/// `Runtime` is a single-threaded event loop: every task runs on the
/// thread that calls [`block_on`](Self::block_on). One turn of the loop
/// polls the ready tasks, fires the expired timers and then parks the
/// thread until the next deadline or until a waker (possibly from another
/// thread) schedules a task.
///
/// A `Runtime` is not `Send`; create one per thread.
pub struct Runtime {
    executor: ExecutorHandle,
    reactor: ReactorHandle,
}

impl Runtime {
    pub(crate) fn new(task_capacity: usize, timer_capacity: usize) -> Self {
        Self {
            executor: Rc::new(Executor::new(task_capacity)),
            reactor: Reactor::handle(timer_capacity),
        }
    }

    /// Spawns a future onto the runtime.
    ///
    /// The task runs the next time the runtime is driven by
    /// [`block_on`](Self::block_on).
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let handle = runtime.spawn(async { 1 });
    /// assert_eq!(runtime.block_on(handle), 1);
    /// ```
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + 'static,
        F::Output: 'static,
    {
        self.executor.spawn(future)
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// Spawned tasks and timers make progress while the future is
    /// pending. The future itself is polled in place, so it does not need
    /// to be `'static`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async {
    ///     42
    /// });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        enter_context(self.reactor.clone(), self.executor.clone(), || {
            let mut future = pin!(future);

            let main = TaskWaker::new(MAIN_TASK, self.executor.queue());
            let waker = Waker::from(main.clone());
            let mut cx = Context::from_waker(&waker);

            loop {
                if main.take_scheduled()
                    && let Poll::Ready(output) = future.as_mut().poll(&mut cx)
                {
                    return output;
                }

                self.executor.run_ready();
                self.reactor.borrow_mut().fire_expired(Instant::now());

                if main.is_scheduled() || self.executor.has_ready() {
                    continue;
                }

                let timeout = self.reactor.borrow_mut().next_timeout(Instant::now());
                trace!(
                    ?timeout,
                    tasks = self.executor.task_count(),
                    "parking runtime"
                );

                self.executor.park(timeout);
                self.reactor.borrow_mut().fire_expired(Instant::now());
            }
        })
    }

    /// Number of armed timers that have neither fired nor been cancelled.
    ///
    /// Every primitive of this crate releases its timers when it settles or
    /// is dropped, so this returns to zero once they are all done.
    pub fn active_timers(&self) -> usize {
        self.reactor.borrow_mut().active()
    }
}
