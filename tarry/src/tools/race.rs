use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Outcome of a [`race`]: which side settled first, and its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    pub fn left(self) -> Option<L> {
        match self {
            Either::Left(l) => Some(l),
            Either::Right(_) => None,
        }
    }

    pub fn right(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(r) => Some(r),
        }
    }
}

/// Races two futures and resolves with the output of whichever
/// completes first.
///
/// `left` is polled before `right` on every wake-up, so it wins when both
/// are ready at the same time. The losing future is not cancelled
/// explicitly; it is dropped together with the `Race`.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// match race(fetch(), sleep(Duration::from_secs(1))).await {
///     Either::Left(value) => println!("got {value}"),
///     Either::Right(()) => println!("too slow"),
/// }
/// ```
pub fn race<L, R>(left: L, right: R) -> Race<L::IntoFuture, R::IntoFuture>
where
    L: IntoFuture,
    R: IntoFuture,
{
    Race {
        left: left.into_future(),
        right: right.into_future(),
    }
}

/// Future returned by [`race`].
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Race<L, R> {
    left: L,
    right: R,
}

impl<L, R> Race<L, R> {
    /// Consumes the race, returning both contenders.
    pub fn into_inner(self) -> (L, R) {
        (self.left, self.right)
    }
}

impl<L, R> Future for Race<L, R>
where
    L: Future,
    R: Future,
{
    type Output = Either<L::Output, R::Output>;

    /// # Safety
    ///
    /// Both fields are projected structurally: they are pinned whenever
    /// the `Race` is, and never moved out while pinned.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = unsafe { self.get_unchecked_mut() };

        let left = unsafe { Pin::new_unchecked(&mut this.left) };
        if let Poll::Ready(val) = left.poll(cx) {
            return Poll::Ready(Either::Left(val));
        }

        let right = unsafe { Pin::new_unchecked(&mut this.right) };
        if let Poll::Ready(val) = right.poll(cx) {
            return Poll::Ready(Either::Right(val));
        }

        Poll::Pending
    }
}
