//! Time and frame sources injected into the controller.
//!
//! The simulation never reads the wall clock or sleeps on its own; it asks
//! a `Clock` for milliseconds and a `Scheduler` for frame slots. Tests and
//! headless runs swap in the manual variants.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Millisecond time source for interval gates
///
/// Values never decrease. Gates subtract consecutive readings, so a clock
/// that runs backwards breaks them.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock
///
/// Clones share the same time, so a test can keep one handle and give the
/// controller another.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Grants frame slots to the run loop
pub trait Scheduler {
    /// Blocks until the next frame slot. Returns false once cancelled or
    /// exhausted; the loop should stop then.
    fn request_tick(&mut self) -> bool;

    /// Stops granting slots. A tick already underway finishes normally.
    fn cancel(&mut self);
}

/// Paces frames against the wall clock at a fixed interval
pub struct FixedStep {
    interval: Duration,
    next: Option<Instant>,
    cancelled: bool,
}

impl FixedStep {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            next: None,
            cancelled: false,
        }
    }
}

impl Scheduler for FixedStep {
    fn request_tick(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        let now = Instant::now();
        let due = self.next.unwrap_or(now);
        if due > now {
            std::thread::sleep(due - now);
        }
        // Late frames reschedule from now instead of accumulating debt.
        self.next = Some(due.max(now) + self.interval);
        true
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Grants a fixed number of frames with no pacing
///
/// The headless driver and tests use this to run an exact tick budget.
pub struct ManualScheduler {
    remaining: u64,
}

impl ManualScheduler {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }
}

impl Scheduler for ManualScheduler {
    fn request_tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn cancel(&mut self) {
        self.remaining = 0;
    }
}
