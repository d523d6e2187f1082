//! Leading-edge rate limiting
//!
//! The first call runs immediately and opens a fixed window. Calls landing
//! inside the window are dropped: not queued, not coalesced. The first call
//! after the window has elapsed opens the next one.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Gate that admits at most one call per window
#[derive(Debug)]
pub struct Throttle {
    limit: Duration,
    window_start: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            window_start: Mutex::new(None),
        }
    }

    pub fn from_millis(limit_ms: u64) -> Self {
        Self::new(Duration::from_millis(limit_ms))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Open a window if none is active. Returns `false` when the call must be dropped.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut window_start = self
            .window_start
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match *window_start {
            Some(start) if now.duration_since(start) < self.limit => false,
            _ => {
                *window_start = Some(now);
                true
            }
        }
    }

    /// Run `f` if the gate is open; `None` means the call was suppressed
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        if self.try_acquire() {
            Some(f())
        } else {
            tracing::trace!(limit_ms = self.limit.as_millis(), "Throttled call suppressed");
            None
        }
    }
}

/// An operation wrapped in a [`Throttle`]
///
/// Arguments are passed as a single value (use a tuple for several) and reach
/// the wrapped operation unchanged on every call that is not suppressed.
#[derive(Debug)]
pub struct Throttled<F> {
    func: F,
    gate: Throttle,
}

impl<F> Throttled<F> {
    pub fn call<A, R>(&self, args: A) -> Option<R>
    where
        F: Fn(A) -> R,
    {
        self.gate.run(|| (self.func)(args))
    }

    pub fn limit(&self) -> Duration {
        self.gate.limit()
    }
}

/// Wrap `func` so it runs at most once per `limit`
pub fn throttle<F>(func: F, limit: Duration) -> Throttled<F> {
    Throttled {
        func,
        gate: Throttle::new(limit),
    }
}
