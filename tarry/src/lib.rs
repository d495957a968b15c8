//! # Tarry
//!
//! **Tarry** is a small toolkit for asynchronous control flow: waiting,
//! giving up, and trying again. It ships four primitives and the
//! single-threaded runtime that drives them:
//!
//! - [`time::sleep`] resolves after a fixed duration
//! - [`time::timeout`] bounds how long a future may take
//! - [`tools::retry`] and [`tools::wait_for`] call a fallible operation
//!   again until it succeeds, with an optional delay between attempts and
//!   a deadline for the whole session
//! - [`sync::deferred`] creates a promise settled through separate
//!   `resolve` / `reject` handles
//!
//! Timers are cancelled as soon as the future owning them is dropped, so
//! a settled `retry` or `timeout` never leaves anything armed behind it
//! (see [`Runtime::active_timers`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::future::ready;
//! use std::time::Duration;
//!
//! use tarry::tools::retry;
//!
//! #[tarry::main]
//! async fn main() {
//!     let mut calls = 0;
//!
//!     let value = retry(|| {
//!         calls += 1;
//!         ready(if calls < 3 { Err("not yet") } else { Ok(calls) })
//!     })
//!     .delay(Duration::from_millis(100))
//!     .timeout(Duration::from_secs(1))
//!     .await;
//!
//!     assert_eq!(value, Ok(3));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`time`]: sleep and timeout
//! - [`tools`]: retry, wait_for and the race combinator
//! - [`sync`]: deferred promises
//! - [`task`]: spawning tasks on the current runtime

mod reactor;
mod runtime;
mod utils;

pub mod sync;
pub mod time;
pub mod tools;

pub use runtime::builder::RuntimeBuilder;
pub use runtime::yield_now::{YieldNow, yield_now};
pub use runtime::{Runtime, task};

pub use tarry_macros::{main, test};
