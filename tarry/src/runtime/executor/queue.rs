use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Shared handle to the ready queue.
pub(crate) type ReadyQueueHandle = Arc<ReadyQueue>;

/// Queue of task ids that were woken and must be polled again.
///
/// This is the only part of the runtime that is touched from other
/// threads: wakers push ids here and notify the condition variable, so a
/// value settled on a foreign thread unparks the runtime thread.
pub(crate) struct ReadyQueue {
    queue: Mutex<VecDeque<usize>>,

    /// Signalled on every push.
    condvar: Condvar,
}

impl ReadyQueue {
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
        }
    }

    pub(crate) fn push(&self, id: usize) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(id);
        self.condvar.notify_one();
    }

    pub(crate) fn pop(&self) -> Option<usize> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Blocks the current thread until an id is pushed or `timeout`
    /// elapses.
    ///
    /// Returns immediately if the queue is not empty. `None` waits without
    /// a time limit.
    pub(crate) fn park(&self, timeout: Option<Duration>) {
        let queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);

        match timeout {
            Some(timeout) => {
                if queue.is_empty() && !timeout.is_zero() {
                    let _queue = self
                        .condvar
                        .wait_timeout_while(queue, timeout, |q| q.is_empty())
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
            None => {
                let _queue = self
                    .condvar
                    .wait_while(queue, |q| q.is_empty())
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }
    }
}
