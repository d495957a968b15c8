//! Time utilities.
//!
//! This module provides the time-related primitives of the crate, all
//! backed by the runtime reactor:
//! - [`sleep`] for waiting a fixed duration,
//! - [`timeout`] for bounding how long a future may take.

mod sleep;
mod timeout;

#[doc(inline)]
pub use sleep::{Sleep, sleep};

#[doc(inline)]
pub use timeout::{Elapsed, Timeout, timeout};
