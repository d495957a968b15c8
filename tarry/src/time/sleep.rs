use crate::reactor::timer::TimerShared;
use crate::runtime::context::CURRENT_REACTOR;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Creates a future that completes after the given duration.
///
/// The duration is measured from this call, not from the first poll.
/// A zero duration completes on the first poll without touching the
/// reactor.
///
/// # Panics
///
/// Panics if polled before its deadline outside of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

/// A future that completes once a specific deadline is reached.
///
/// `Sleep` registers a timer with the runtime reactor on its first poll.
/// Dropping it cancels that timer, so a `Sleep` that loses a race never
/// wakes anyone and no longer counts towards
/// [`Runtime::active_timers`](crate::Runtime::active_timers).
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Sleep {
    /// Absolute point in time when the sleep completes.
    deadline: Instant,

    /// Reactor registration, present once the sleep has been polled.
    timer: Option<Arc<TimerShared>>,
}

/// Stand-in horizon for durations too large to add to `Instant::now()`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + duration`, clamped so that huge durations never overflow.
fn deadline_after(duration: Duration) -> Instant {
    let now = Instant::now();

    now.checked_add(duration)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

impl Sleep {
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            deadline: deadline_after(duration),
            timer: None,
        }
    }

    /// The instant at which this sleep completes.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Returns `true` if the deadline has passed, whether or not the
    /// reactor has fired the timer yet.
    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.is_elapsed() {
            return Poll::Ready(());
        }

        match &this.timer {
            Some(timer) => timer.set_waker(cx.waker()),
            None => {
                let timer = Arc::new(TimerShared::new(cx.waker()));

                CURRENT_REACTOR.with(|cell| {
                    let binding = cell.borrow();
                    let reactor = binding.as_ref().expect("Sleep polled outside of runtime");

                    reactor.borrow_mut().register(this.deadline, timer.clone());
                });

                this.timer = Some(timer);
            }
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(timer) = &self.timer {
            timer.cancel();
        }
    }
}
