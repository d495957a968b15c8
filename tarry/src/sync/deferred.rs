use std::fmt;
use std::future::{Future, IntoFuture};
use std::mem;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};

/// Creates a promise together with the handles that settle it.
///
/// The three parts of the returned [`Deferred`] share one settlement
/// cell. The first call to [`Resolve::resolve`], [`Resolve::resolve_with`]
/// or [`Reject::reject`] decides the outcome; every later call is a no-op
/// returning `false`.
///
/// The settling handles are `Send` and `Clone`, so a promise can be
/// completed from another task or another thread. If every handle is
/// dropped while the promise is still pending, it never completes.
///
/// # Examples
///
/// ```rust,ignore
/// let Deferred { promise, resolve, .. } = deferred::<u32, String>();
///
/// std::thread::spawn(move || resolve.resolve(7));
/// assert_eq!(promise.await, Ok(7));
/// ```
pub fn deferred<T, E>() -> Deferred<T, E> {
    Deferred::new()
}

type Cell<T, E> = Arc<Mutex<Inner<T, E>>>;

type Adopted<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

struct Inner<T, E> {
    state: State<T, E>,
    waker: Option<Waker>,
}

enum State<T, E> {
    Pending,
    /// Follows the outcome of another future.
    Adopted(Adopted<T, E>),
    /// The adopted future is being polled by the promise.
    Polling,
    Settled(Result<T, E>),
    /// The promise returned the outcome.
    Taken,
}

impl<T, E> State<T, E> {
    fn label(&self) -> &'static str {
        match self {
            State::Pending => "pending",
            State::Adopted(_) | State::Polling => "adopted",
            State::Settled(Ok(_)) => "resolved",
            State::Settled(Err(_)) => "rejected",
            State::Taken => "taken",
        }
    }
}

fn lock<T, E>(cell: &Cell<T, E>) -> MutexGuard<'_, Inner<T, E>> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Moves a pending cell to `next` and wakes the promise.
fn settle<T, E>(cell: &Cell<T, E>, next: State<T, E>) -> bool {
    let waker = {
        let mut inner = lock(cell);
        if !matches!(inner.state, State::Pending) {
            return false;
        }

        inner.state = next;
        inner.waker.take()
    };

    if let Some(waker) = waker {
        waker.wake();
    }

    true
}

fn is_settled<T, E>(cell: &Cell<T, E>) -> bool {
    !matches!(lock(cell).state, State::Pending)
}

/// A promise and its settling handles, see [`deferred`].
///
/// The fields are public so the value can be destructured.
pub struct Deferred<T = (), E = ()> {
    pub promise: Promise<T, E>,
    pub resolve: Resolve<T, E>,
    pub reject: Reject<T, E>,
}

impl<T, E> Deferred<T, E> {
    pub fn new() -> Self {
        let cell = Arc::new(Mutex::new(Inner {
            state: State::Pending,
            waker: None,
        }));

        Self {
            promise: Promise { cell: cell.clone() },
            resolve: Resolve { cell: cell.clone() },
            reject: Reject { cell },
        }
    }

    /// Returns `true` once a settling call has taken effect.
    pub fn is_settled(&self) -> bool {
        is_settled(&self.promise.cell)
    }

    pub fn into_parts(self) -> (Promise<T, E>, Resolve<T, E>, Reject<T, E>) {
        (self.promise, self.resolve, self.reject)
    }
}

impl<T, E> Default for Deferred<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("state", &lock(&self.promise.cell).state.label())
            .finish()
    }
}

/// The awaiting side of a [`Deferred`].
///
/// Resolves to `Ok(value)` or `Err(reason)`. Polling it again after it
/// completed panics.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Promise<T = (), E = ()> {
    cell: Cell<T, E>,
}

impl<T, E> Future for Promise<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = lock(&self.cell);

        match mem::replace(&mut inner.state, State::Polling) {
            State::Pending => {
                inner.state = State::Pending;
                match &mut inner.waker {
                    Some(waker) if waker.will_wake(cx.waker()) => {}
                    slot => *slot = Some(cx.waker().clone()),
                }

                Poll::Pending
            }

            State::Settled(result) => {
                inner.state = State::Taken;
                Poll::Ready(result)
            }

            // Poll the adopted future without holding the lock: it may
            // settle something that shares this cell.
            State::Adopted(mut future) => {
                drop(inner);
                let poll = future.as_mut().poll(cx);

                let mut inner = lock(&self.cell);
                match poll {
                    Poll::Ready(result) => {
                        inner.state = State::Taken;
                        Poll::Ready(result)
                    }
                    Poll::Pending => {
                        inner.state = State::Adopted(future);
                        Poll::Pending
                    }
                }
            }

            State::Polling => unreachable!("`Promise` polled re-entrantly"),

            State::Taken => {
                inner.state = State::Taken;
                drop(inner);
                panic!("`Promise` polled after completion")
            }
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &lock(&self.cell).state.label())
            .finish()
    }
}

/// Fulfilling handle of a [`Deferred`].
pub struct Resolve<T = (), E = ()> {
    cell: Cell<T, E>,
}

impl<T, E> Resolve<T, E> {
    /// Fulfills the promise with `value`.
    ///
    /// Returns `false` if the promise was already settled.
    pub fn resolve(&self, value: T) -> bool {
        settle(&self.cell, State::Settled(Ok(value)))
    }

    /// Makes the promise follow the outcome of `future`.
    ///
    /// The future is driven by the task awaiting the promise. Returns
    /// `false` if the promise was already settled, in which case `future`
    /// is dropped without being polled.
    pub fn resolve_with<F>(&self, future: F) -> bool
    where
        F: IntoFuture<Output = Result<T, E>>,
        F::IntoFuture: Send + 'static,
    {
        settle(&self.cell, State::Adopted(Box::pin(future.into_future())))
    }

    pub fn is_settled(&self) -> bool {
        is_settled(&self.cell)
    }
}

impl<T, E> Clone for Resolve<T, E> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Resolve<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve").finish_non_exhaustive()
    }
}

/// Rejecting handle of a [`Deferred`].
pub struct Reject<T = (), E = ()> {
    cell: Cell<T, E>,
}

impl<T, E> Reject<T, E> {
    /// Rejects the promise with `reason`.
    ///
    /// Returns `false` if the promise was already settled.
    pub fn reject(&self, reason: E) -> bool {
        settle(&self.cell, State::Settled(Err(reason)))
    }

    pub fn is_settled(&self) -> bool {
        is_settled(&self.cell)
    }
}

impl<T, E> Clone for Reject<T, E> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Reject<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reject").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::deferred;

    use std::future::{Future, ready};
    use std::pin::Pin;
    use std::task::{Context, Poll, Waker};

    fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
        let mut cx = Context::from_waker(Waker::noop());
        Pin::new(future).poll(&mut cx)
    }

    #[test]
    fn first_settlement_wins() {
        let mut d = deferred::<u8, &str>();

        assert!(!d.is_settled());
        assert!(d.reject.reject("nope"));
        assert!(!d.resolve.resolve(1));
        assert!(!d.reject.reject("again"));
        assert!(d.resolve.is_settled());

        assert_eq!(poll_once(&mut d.promise), Poll::Ready(Err("nope")));
    }

    #[test]
    fn pending_until_settled() {
        let (mut promise, resolve, _) = deferred::<u8, ()>().into_parts();

        assert_eq!(poll_once(&mut promise), Poll::Pending);
        resolve.clone().resolve(3);
        assert_eq!(poll_once(&mut promise), Poll::Ready(Ok(3)));
    }

    #[test]
    fn adopts_another_future() {
        let d = deferred::<&str, ()>();
        let mut promise = d.promise;

        assert!(d.resolve.resolve_with(ready(Ok("adopted"))));
        assert!(!d.resolve.resolve("late"));
        assert_eq!(format!("{promise:?}"), "Promise { state: \"adopted\" }");

        assert_eq!(poll_once(&mut promise), Poll::Ready(Ok("adopted")));
    }

    #[test]
    #[should_panic(expected = "polled after completion")]
    fn polling_after_completion_panics() {
        let mut d = deferred::<(), ()>();
        d.resolve.resolve(());

        let _ = poll_once(&mut d.promise);
        let _ = poll_once(&mut d.promise);
    }
}
