use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Completion slot shared by a spawned task and its [`JoinHandle`].
pub(crate) struct JoinState<T> {
    output: Option<T>,
    finished: bool,
    waiter: Option<Waker>,
}

impl<T> JoinState<T> {
    pub(crate) fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            output: None,
            finished: false,
            waiter: None,
        }))
    }

    /// Stores the task output and wakes the handle, if it is waiting.
    pub(crate) fn complete(&mut self, output: T) {
        self.output = Some(output);
        self.finished = true;

        if let Some(waker) = self.waiter.take() {
            waker.wake();
        }
    }
}

/// A handle to a spawned task.
///
/// A `JoinHandle` resolves to the task's output once it has completed.
///
/// Dropping the `JoinHandle` does **not** cancel the task; it only
/// discards the ability to observe its result. This is what makes a
/// spawned operation keep running after a retry deadline abandons it.
pub struct JoinHandle<T> {
    pub(crate) state: Rc<RefCell<JoinState<T>>>,
}

impl<T> JoinHandle<T> {
    /// Returns `true` once the task has run to completion.
    pub fn is_finished(&self) -> bool {
        self.state.borrow().finished
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if polled again after returning the output.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut state = self.state.borrow_mut();

        if let Some(output) = state.output.take() {
            return Poll::Ready(output);
        }

        assert!(!state.finished, "`JoinHandle` polled after completion");

        state.waiter = Some(cx.waker().clone());
        Poll::Pending
    }
}
