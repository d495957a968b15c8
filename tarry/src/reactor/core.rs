use super::timer::{TimerEntry, TimerShared};

use std::cell::RefCell;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared handle to the reactor of the current runtime.
pub(crate) type ReactorHandle = Rc<RefCell<Reactor>>;

/// Timer driver of the runtime.
///
/// The reactor keeps every armed timer in a min-heap keyed by deadline.
/// It never blocks on its own: the event loop asks it how long it may
/// park and then asks it to fire whatever expired in the meantime.
pub(crate) struct Reactor {
    timers: BinaryHeap<TimerEntry>,

    /// Heap size at which `register` drops cancelled entries first.
    compact_at: usize,
}

/// Smallest heap worth compacting.
const MIN_COMPACT_AT: usize = 64;

impl Reactor {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            timers: BinaryHeap::with_capacity(capacity),
            compact_at: MIN_COMPACT_AT,
        }
    }

    pub(crate) fn handle(capacity: usize) -> ReactorHandle {
        Rc::new(RefCell::new(Self::new(capacity)))
    }

    /// Arms a timer that fires `shared` once `deadline` has passed.
    ///
    /// Cancelled entries are normally discarded when they reach the top of
    /// the heap. Once the heap doubles since the last compaction they are
    /// swept out here, so long-lived cancelled timers cannot pile up.
    pub(crate) fn register(&mut self, deadline: Instant, shared: Arc<TimerShared>) {
        if self.timers.len() >= self.compact_at {
            self.compact();
        }

        self.timers.push(TimerEntry { deadline, shared });
    }

    fn compact(&mut self) {
        self.timers.retain(|timer| !timer.shared.is_cancelled());
        self.compact_at = (self.timers.len() * 2).max(MIN_COMPACT_AT);
    }

    /// Wakes every live timer whose deadline is at or before `now`.
    ///
    /// Returns the number of timers fired. Cancelled entries met on the
    /// way are discarded without waking anyone.
    pub(crate) fn fire_expired(&mut self, now: Instant) -> usize {
        let mut fired = 0;

        while let Some(timer) = self.timers.peek() {
            if timer.deadline > now {
                break;
            }

            let Some(timer) = self.timers.pop() else {
                break;
            };

            if timer.shared.is_cancelled() {
                continue;
            }

            timer.shared.fire();
            fired += 1;
        }

        fired
    }

    /// How long the event loop may park before the next live timer is due.
    ///
    /// `None` means no timer is armed and the loop may park until woken.
    pub(crate) fn next_timeout(&mut self, now: Instant) -> Option<Duration> {
        while self
            .timers
            .peek()
            .is_some_and(|timer| timer.shared.is_cancelled())
        {
            self.timers.pop();
        }

        self.timers
            .peek()
            .map(|timer| timer.deadline.saturating_duration_since(now))
    }

    /// Number of armed timers that are neither fired nor cancelled.
    ///
    /// Compacts the heap as a side effect.
    pub(crate) fn active(&mut self) -> usize {
        self.compact();
        self.timers.len()
    }
}
