//! Synchronization primitives.
//!
//! [`deferred`] splits a promise from the handles that settle it, so an
//! outcome produced by a callback, another task or another thread can be
//! awaited like any other future.

mod deferred;

#[doc(inline)]
pub use deferred::{Deferred, Promise, Reject, Resolve, deferred};
