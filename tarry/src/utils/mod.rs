//! Internal data structures.
//!
//! Currently only the [`Slab`] used by the executor to store spawned
//! tasks under small, reusable keys.

mod slab;

pub(crate) use slab::Slab;
