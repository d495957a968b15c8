use crate::reactor::ReactorHandle;
use crate::runtime::executor::core::ExecutorHandle;

use std::cell::RefCell;

thread_local! {
    /// Thread-local handle to the current reactor.
    ///
    /// Set while a runtime drives futures on this thread, so that timers
    /// can register themselves without explicit parameter passing.
    pub(crate) static CURRENT_REACTOR: RefCell<Option<ReactorHandle>> =
        const { RefCell::new(None) };

    /// Thread-local handle to the current executor, used by
    /// [`spawn`](crate::task::spawn).
    pub(crate) static CURRENT_EXECUTOR: RefCell<Option<ExecutorHandle>> =
        const { RefCell::new(None) };
}

/// Enters the runtime execution context for the current thread.
///
/// Installs the reactor and executor handles for the duration of `f` and
/// restores whatever was installed before, which keeps nested runtimes on
/// the same thread independent.
pub(crate) fn enter_context<R>(
    reactor: ReactorHandle,
    executor: ExecutorHandle,
    f: impl FnOnce() -> R,
) -> R {
    let prev_reactor = CURRENT_REACTOR.with(|r| r.replace(Some(reactor)));
    let prev_executor = CURRENT_EXECUTOR.with(|e| e.replace(Some(executor)));

    let out = f();

    CURRENT_EXECUTOR.with(|e| e.replace(prev_executor));
    CURRENT_REACTOR.with(|r| r.replace(prev_reactor));

    out
}
