//! Task spawning.
//!
//! Tasks are futures owned by the runtime and polled on its thread. Use
//! [`spawn`] to start one and await the returned [`JoinHandle`] for its
//! output.

pub(crate) mod handle;
pub(crate) mod waker;

mod core;

pub(crate) use self::core::Task;

pub use self::core::spawn;
pub use handle::JoinHandle;
