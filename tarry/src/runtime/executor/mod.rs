//! Task executor implementation.
//!
//! - [`core`]: the executor itself, owning the task slab,
//! - [`queue`]: the ready queue fed by task wakers.

pub(crate) mod core;
pub(crate) mod queue;
