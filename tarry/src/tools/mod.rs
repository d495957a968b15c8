//! Control-flow tools for fallible asynchronous operations.
//!
//! The main entry point is [`retry`], which calls an operation again
//! until it succeeds, runs out of attempts, or hits the session
//! deadline. [`wait_for`] is the same engine preset for polling a
//! condition. Both race each attempt against the deadline with [`race`],
//! which is also exported for general use.

mod error;
mod options;
mod race;
mod retry;

#[doc(inline)]
pub use error::{Reason, RetryError};

#[doc(inline)]
pub use options::{Retries, RetryOptions};

#[doc(inline)]
pub use race::{Either, Race, race};

#[doc(inline)]
pub use retry::{Retry, retry, wait_for};
