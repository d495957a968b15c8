//! Core runtime components.
//!
//! This module contains the single-threaded runtime that drives every
//! primitive of the crate:
//! - the executor and its ready queue,
//! - spawned tasks and their join handles,
//! - the thread-local runtime context used by timers and `spawn`,
//! - cooperative yielding.
//!
//! Most users only touch [`RuntimeBuilder`](crate::RuntimeBuilder), the
//! `#[tarry::main]` / `#[tarry::test]` attributes and [`task::spawn`].

mod core;
mod executor;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub mod task;

pub use self::core::Runtime;
