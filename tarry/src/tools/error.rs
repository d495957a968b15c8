use crate::time::Elapsed;

use std::borrow::Cow;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Failure of a retry session.
///
/// The variant is the single most specific reason available when the
/// session gave up: the operation's own error if it ever produced a
/// non-blank one, otherwise the deadline, otherwise the attempt count.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError<E> {
    /// Last non-blank error returned by the operation, unmodified.
    #[error("{0}")]
    Failed(E),

    /// The session deadline passed before any non-blank error was seen.
    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    /// Every attempt failed with a blank reason.
    #[error("failed after {0} tries")]
    Exhausted(usize),
}

impl<E> RetryError<E> {
    /// Returns the operation's error, if that is what ended the session.
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::Failed(e) => Some(e),
            RetryError::TimedOut(_) | RetryError::Exhausted(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RetryError::TimedOut(_))
    }
}

/// A failure value that may carry no information.
///
/// The retry engine keeps the last failure an operation produced, but a
/// blank one never replaces an informative one. If only blank failures
/// were seen, the session reports the deadline or the attempt count
/// instead.
///
/// Most error types are never blank and can use the default method:
///
/// ```rust,ignore
/// impl Reason for MyError {}
/// ```
pub trait Reason {
    /// Returns `true` if this failure carries no information.
    fn is_blank(&self) -> bool {
        false
    }
}

/// A failure with no payload at all.
impl Reason for () {
    fn is_blank(&self) -> bool {
        true
    }
}

impl<T> Reason for Option<T> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

impl Reason for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Reason for &str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Reason for Cow<'_, str> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Reason for io::Error {}

impl Reason for Box<dyn std::error::Error> {}

impl Reason for Box<dyn std::error::Error + Send + Sync> {}

impl Reason for Elapsed {}

impl<E> Reason for RetryError<E> {}

#[cfg(test)]
mod tests {
    use super::{Reason, RetryError};

    use std::time::Duration;

    #[test]
    fn messages_match_the_documented_formats() {
        let timed_out: RetryError<&str> = RetryError::TimedOut(Duration::from_millis(100));
        let exhausted: RetryError<&str> = RetryError::Exhausted(4);

        assert_eq!(timed_out.to_string(), "timed out after 100ms");
        assert_eq!(exhausted.to_string(), "failed after 4 tries");
        assert_eq!(RetryError::Failed("FAIL").to_string(), "FAIL");
    }

    #[test]
    fn into_inner_only_yields_operation_errors() {
        assert_eq!(RetryError::Failed(7).into_inner(), Some(7));
        assert_eq!(RetryError::<i32>::Exhausted(2).into_inner(), None);
        assert!(RetryError::<i32>::TimedOut(Duration::ZERO).is_timeout());
    }

    #[test]
    fn blank_reasons() {
        assert!(().is_blank());
        assert!(None::<u8>.is_blank());
        assert!("".is_blank());
        assert!(String::new().is_blank());

        assert!(!Some(0).is_blank());
        assert!(!"FAIL".is_blank());
        assert!(!std::io::Error::other("boom").is_blank());
    }
}
