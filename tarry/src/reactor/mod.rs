//! Timer driver.
//!
//! The reactor owns every armed timer of a runtime and wakes the tasks
//! waiting on them once their deadline passes. It runs on the runtime
//! thread, in between executor turns; it is not a thread of its own.
//!
//! Most runtime users do not interact with the reactor directly; it backs
//! [`sleep`](crate::time::sleep) and everything built on top of it.

mod core;

pub(crate) mod timer;

pub(crate) use self::core::{Reactor, ReactorHandle};
