use crate::time::sleep::{Sleep, sleep};
use crate::tools::{Either, Race, race};

use std::borrow::Cow;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use thiserror::Error;

/// Requires a future to complete before `duration` has elapsed.
///
/// If the future completes in time its output is returned unchanged in
/// `Ok`, including a failure it produced itself: a `Future<Output =
/// Result<T, E>>` resolves to `Ok(Err(e))`. Otherwise the result is
/// `Err(Elapsed)`, carrying either the default `"timed out after <ms>ms"`
/// message or the one set with [`Timeout::message`] /
/// [`Timeout::message_with`].
///
/// The wrapped future is polled first, so an already-ready future wins
/// even against a zero duration. On the success path the timer is
/// cancelled as soon as the `Timeout` is dropped.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// let res = timeout(Duration::from_millis(50), handle)
///     .message("backend did not answer")
///     .await;
/// ```
pub fn timeout<F>(duration: Duration, future: F) -> Timeout<F::IntoFuture>
where
    F: IntoFuture,
{
    Timeout::new(duration, future.into_future())
}

/// Error returned by [`Timeout`] when the deadline passes first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Elapsed {
    duration: Duration,
    message: Cow<'static, str>,
}

impl Elapsed {
    pub(crate) fn new(duration: Duration, message: Option<Message>) -> Self {
        let message = match message {
            Some(Message::Literal(text)) => text,
            Some(Message::Lazy(build)) => Cow::Owned(build()),
            None => Cow::Owned(default_message(duration)),
        };

        Self { duration, message }
    }

    /// The duration the future was given.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Message reported when a deadline passes.
fn default_message(duration: Duration) -> String {
    format!("timed out after {}ms", duration.as_millis())
}

/// Override of the timeout message.
pub(crate) enum Message {
    Literal(Cow<'static, str>),
    /// Built only if the timer actually fires.
    Lazy(Box<dyn FnOnce() -> String + Send>),
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Message::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Future returned by [`timeout`].
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Timeout<F> {
    race: Race<F, Sleep>,
    duration: Duration,
    message: Option<Message>,
}

impl<F> Timeout<F> {
    pub(crate) fn new(duration: Duration, future: F) -> Self
    where
        F: Future,
    {
        Timeout {
            race: race(future, sleep(duration)),
            duration,
            message: None,
        }
    }

    /// Reports `message` instead of the default one on expiry.
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(Message::Literal(message.into()));
        self
    }

    /// Builds the expiry message with `build`, called only if the timer
    /// fires.
    pub fn message_with<M>(mut self, build: M) -> Self
    where
        M: FnOnce() -> String + Send + 'static,
    {
        self.message = Some(Message::Lazy(Box::new(build)));
        self
    }

    /// Consumes the `Timeout`, returning the wrapped future.
    pub fn into_inner(self) -> F {
        self.race.into_inner().0
    }
}

impl<F> Future for Timeout<F>
where
    F: Future,
{
    type Output = Result<F::Output, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = unsafe { self.get_unchecked_mut() };

        let race = unsafe { Pin::new_unchecked(&mut this.race) };
        match race.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Either::Left(output)) => Poll::Ready(Ok(output)),
            Poll::Ready(Either::Right(())) => {
                Poll::Ready(Err(Elapsed::new(this.duration, this.message.take())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Elapsed, Message};

    use std::time::Duration;

    #[test]
    fn default_message_uses_milliseconds() {
        let elapsed = Elapsed::new(Duration::from_millis(250), None);

        assert_eq!(elapsed.to_string(), "timed out after 250ms");
        assert_eq!(elapsed.duration(), Duration::from_millis(250));
    }

    #[test]
    fn literal_message_overrides_default() {
        let elapsed = Elapsed::new(
            Duration::from_millis(5),
            Some(Message::Literal("too slow".into())),
        );

        assert_eq!(elapsed.message(), "too slow");
    }

    #[test]
    fn lazy_message_is_built_on_expiry() {
        let elapsed = Elapsed::new(
            Duration::from_secs(1),
            Some(Message::Lazy(Box::new(|| format!("gave up after {}s", 1)))),
        );

        assert_eq!(elapsed.to_string(), "gave up after 1s");
    }
}
