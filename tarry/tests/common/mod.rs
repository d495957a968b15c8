#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Pause used to check that nothing keeps calling an operation after a
/// retry session settled.
pub const GRACE: Duration = Duration::from_millis(200);

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// `actual` is at least `expected`, with 5% tolerance for timer slack.
pub fn at_least(actual: Duration, expected: Duration) -> bool {
    actual.as_secs_f64() >= expected.as_secs_f64() * 0.95
}

/// Record of the calls made to a [`stub`] operation.
#[derive(Clone, Default)]
pub struct Calls(Rc<RefCell<Vec<Instant>>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Time between consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        self.0
            .borrow()
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }

    fn record(&self) -> usize {
        let mut calls = self.0.borrow_mut();
        calls.push(Instant::now());
        calls.len()
    }
}

/// Wraps `f` so every call is recorded in `calls`. `f` receives the
/// 1-based call number.
pub fn stub<R>(calls: &Calls, mut f: impl FnMut(usize) -> R) -> impl FnMut() -> R {
    let calls = calls.clone();
    move || f(calls.record())
}
