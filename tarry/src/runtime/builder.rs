use super::Runtime;

/// Default number of task slots allocated up front.
const DEFAULT_TASK_CAPACITY: usize = 64;

/// Default capacity of the timer heap.
const DEFAULT_TIMER_CAPACITY: usize = 64;

/// Builder for configuring and creating a runtime.
///
/// Both knobs only size the initial allocations; task and timer storage
/// grows on demand.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .task_capacity(256)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    task_capacity: usize,
    timer_capacity: usize,
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with default configuration.
    pub fn new() -> Self {
        Self {
            task_capacity: DEFAULT_TASK_CAPACITY,
            timer_capacity: DEFAULT_TIMER_CAPACITY,
        }
    }

    /// Sets the number of task slots allocated when the runtime starts.
    pub fn task_capacity(mut self, n: usize) -> Self {
        self.task_capacity = n;
        self
    }

    /// Sets the initial capacity of the timer heap.
    pub fn timer_capacity(mut self, n: usize) -> Self {
        self.timer_capacity = n;
        self
    }

    /// Builds the runtime with the configured options.
    pub fn build(self) -> Runtime {
        Runtime::new(self.task_capacity, self.timer_capacity)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
