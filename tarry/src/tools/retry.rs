use super::error::{Reason, RetryError};
use super::options::{Retries, RetryOptions};
use super::race::{Either, race};
use crate::runtime::yield_now::{YieldNow, yield_now};
use crate::time::{Sleep, sleep};

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tracing::{debug, trace};

/// Runs `action` until it succeeds or the retry policy gives up.
///
/// `action` is called once per attempt and returns anything that can be
/// awaited into a `Result`; a synchronous action can return
/// `std::future::ready(..)`. The default policy allows three retries
/// (four attempts) with no delay and no timeout; adjust it with the
/// builder methods of [`Retry`] before awaiting it.
///
/// When every attempt fails, the error is the last informative failure
/// of the operation ([`RetryError::Failed`]). If the operation only ever
/// failed with blank reasons (see [`Reason`]), it is
/// [`RetryError::TimedOut`] when the deadline ended the session and
/// [`RetryError::Exhausted`] otherwise.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// let body = retry(|| fetch("https://example.com"))
///     .retries(2)
///     .delay(Duration::from_millis(100))
///     .timeout(Duration::from_secs(1))
///     .await?;
/// ```
pub fn retry<A, F, T, E>(action: A) -> Retry<A, F, E>
where
    A: FnMut() -> F,
    F: IntoFuture<Output = Result<T, E>>,
{
    Retry::new(action, RetryOptions::default())
}

/// Polls `action` until it succeeds: [`retry`] with the
/// [`RetryOptions::wait_for`] preset (every 10ms, no attempt limit, 500ms
/// timeout).
///
/// Builder calls on the returned [`Retry`] override the preset.
///
/// ```rust,ignore
/// wait_for(|| ready(server.is_up().then_some(()).ok_or("server down"))).await?;
/// ```
pub fn wait_for<A, F, T, E>(action: A) -> Retry<A, F, E>
where
    A: FnMut() -> F,
    F: IntoFuture<Output = Result<T, E>>,
{
    Retry::new(action, RetryOptions::wait_for())
}

/// Future returned by [`retry`] and [`wait_for`].
///
/// The session starts on the first poll: the deadline is armed then and
/// the policy can no longer change.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Retry<A, F: IntoFuture, E> {
    action: A,
    options: RetryOptions,
    stage: Stage<F::IntoFuture>,
    session: Session<E>,
}

// No field is ever pinned: the attempt future is boxed and the rest is
// only accessed through `&mut`.
impl<A, F: IntoFuture, E> Unpin for Retry<A, F, E> {}

enum Stage<Fut> {
    /// Not polled yet.
    Start,
    /// Between attempts: decide whether to go on.
    Idle,
    Attempt(Pin<Box<Fut>>),
    Delay(Sleep),
    /// Zero delay: give the executor a turn before the next attempt.
    Yield(YieldNow),
    Done,
}

/// State of one retry call.
struct Session<E> {
    attempts: usize,

    /// Last non-blank failure of the operation.
    last: Option<E>,

    timed_out: bool,

    /// Session-wide deadline, dropped (and thereby cancelled) on every
    /// exit path.
    deadline: Option<Sleep>,
}

impl<E> Session<E> {
    fn new() -> Self {
        Self {
            attempts: 0,
            last: None,
            timed_out: false,
            deadline: None,
        }
    }
}

impl<E: Reason> Session<E> {
    fn arm(&mut self, timeout: Duration) {
        if !timeout.is_zero() {
            self.deadline = Some(sleep(timeout));
        }
    }

    fn disarm(&mut self) {
        self.deadline = None;
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.as_ref().is_some_and(Sleep::is_elapsed)
    }

    fn expire(&mut self, timeout: Duration) {
        self.disarm();

        if !self.timed_out {
            self.timed_out = true;
            debug!(
                timeout_ms = timeout.as_millis() as u64,
                attempts = self.attempts,
                "retry deadline expired"
            );
        }
    }

    fn capture(&mut self, error: E, retries: Retries) {
        if error.is_blank() {
            debug!(attempt = self.attempts, %retries, "attempt failed without a reason");
            return;
        }

        debug!(attempt = self.attempts, %retries, "attempt failed");
        self.last = Some(error);
    }

    fn exhausted(&self, retries: Retries) -> bool {
        retries
            .max_attempts()
            .is_some_and(|max| self.attempts >= max)
    }

    fn into_error(&mut self, timeout: Duration) -> RetryError<E> {
        self.disarm();

        match self.last.take() {
            Some(error) => RetryError::Failed(error),
            None if self.timed_out => RetryError::TimedOut(timeout),
            None => {
                debug!(attempts = self.attempts, "retry attempts exhausted");
                RetryError::Exhausted(self.attempts)
            }
        }
    }
}

impl<A, F: IntoFuture, E> Retry<A, F, E> {
    fn new(action: A, options: RetryOptions) -> Self {
        Self {
            action,
            options,
            stage: Stage::Start,
            session: Session::new(),
        }
    }

    /// Allows `retries` attempts after the first one.
    pub fn retries(mut self, retries: impl Into<Retries>) -> Self {
        self.options = self.options.retries(retries);
        self
    }

    /// Retries until success or timeout.
    pub fn unbounded(mut self) -> Self {
        self.options = self.options.unbounded();
        self
    }

    /// Pause between a failed attempt and the next one.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.options = self.options.delay(delay);
        self
    }

    /// Deadline for the whole session; zero disables it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.timeout(timeout);
        self
    }

    /// Replaces the whole policy.
    pub fn options(mut self, options: RetryOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> usize {
        self.session.attempts
    }
}

/// The session deadline as a future; never completes when disabled.
struct Deadline<'a>(&'a mut Option<Sleep>);

impl Future for Deadline<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.get_mut().0 {
            Some(deadline) => Pin::new(deadline).poll(cx),
            None => Poll::Pending,
        }
    }
}

impl<A, F, T, E> Future for Retry<A, F, E>
where
    A: FnMut() -> F,
    F: IntoFuture<Output = Result<T, E>>,
    E: Reason,
{
    type Output = Result<T, RetryError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let RetryOptions {
            retries,
            delay,
            timeout,
        } = this.options;

        loop {
            match &mut this.stage {
                Stage::Start => {
                    this.session.arm(timeout);
                    this.stage = Stage::Idle;
                }

                Stage::Idle => {
                    if this.session.deadline_passed() {
                        this.session.expire(timeout);
                    }

                    if this.session.timed_out || this.session.exhausted(retries) {
                        this.stage = Stage::Done;
                        return Poll::Ready(Err(this.session.into_error(timeout)));
                    }

                    this.session.attempts += 1;
                    trace!(attempt = this.session.attempts, %retries, "starting attempt");

                    let future = (this.action)().into_future();
                    this.stage = Stage::Attempt(Box::pin(future));
                }

                Stage::Attempt(future) => {
                    let mut contest = race(future.as_mut(), Deadline(&mut this.session.deadline));

                    let outcome = match Pin::new(&mut contest).poll(cx) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(outcome) => outcome,
                    };

                    match outcome {
                        Either::Left(Ok(value)) => {
                            trace!(attempt = this.session.attempts, "attempt succeeded");
                            this.session.disarm();
                            this.stage = Stage::Done;
                            return Poll::Ready(Ok(value));
                        }
                        Either::Left(Err(error)) => {
                            this.session.capture(error, retries);

                            // The delay runs after the last attempt too: the
                            // deadline may still fire during it.
                            this.stage = if !delay.is_zero() {
                                Stage::Delay(sleep(delay))
                            } else if this.session.exhausted(retries) {
                                Stage::Idle
                            } else {
                                Stage::Yield(yield_now())
                            };
                        }
                        Either::Right(()) => {
                            this.session.expire(timeout);
                            this.stage = Stage::Idle;
                        }
                    }
                }

                Stage::Delay(pause) => {
                    let mut contest = race(pause, Deadline(&mut this.session.deadline));

                    match Pin::new(&mut contest).poll(cx) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Either::Left(())) => {}
                        Poll::Ready(Either::Right(())) => this.session.expire(timeout),
                    }

                    this.stage = Stage::Idle;
                }

                Stage::Yield(turn) => {
                    if Pin::new(turn).poll(cx).is_pending() {
                        return Poll::Pending;
                    }

                    this.stage = Stage::Idle;
                }

                Stage::Done => panic!("`Retry` polled after completion"),
            }
        }
    }
}
