//! Wall clock with optional suspend compensation.
//!
//! A sleep that overruns its request by more than a factor of two is treated
//! as time the machine spent suspended or stalled. With adjustment enabled the
//! excess is folded into an offset that [`Clock::now`] subtracts, so a run that
//! was suspended halfway resumes where it left off instead of being cut short.

use std::time::{Duration, Instant};

use log::warn;

/// Sleeps longer than this multiple of the request count as a stall.
const OVERRUN_FACTOR: f64 = 2.0;

/// Source of monotonic time in seconds plus a blocking sleep.
pub trait TimeSource {
    /// Seconds since an arbitrary fixed epoch.
    fn now(&self) -> f64;

    /// Block the calling thread for `seconds`.
    fn sleep(&self, seconds: f64);
}

/// Monotonic system time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemTime {
    epoch: Instant,
}

impl SystemTime {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTime {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn sleep(&self, seconds: f64) {
        std::thread::sleep(Duration::from_secs_f64(seconds));
    }
}

/// Clock handed to the scheduler for every time query and sleep.
#[derive(Debug)]
pub struct Clock<T: TimeSource = SystemTime> {
    source: T,
    adjust: bool,
    adjusted_offset: f64,
}

impl Clock<SystemTime> {
    /// Create a clock over the system monotonic time.
    ///
    /// # Arguments
    ///
    /// * `adjust` - Enable suspend compensation.
    pub fn system(adjust: bool) -> Self {
        Self::new(SystemTime::new(), adjust)
    }
}

impl<T: TimeSource> Clock<T> {
    pub fn new(source: T, adjust: bool) -> Self {
        Self {
            source,
            adjust,
            adjusted_offset: 0.0,
        }
    }

    /// Current time in seconds, minus any accumulated stall time.
    pub fn now(&self) -> f64 {
        if self.adjust {
            self.source.now() - self.adjusted_offset
        } else {
            self.source.now()
        }
    }

    /// Sleep for `seconds`, recording any gross overrun when adjusting.
    ///
    /// Non-positive and non-finite requests return immediately.
    pub fn sleep(&mut self, seconds: f64) {
        if !seconds.is_finite() || seconds <= 0.0 {
            return;
        }

        if !self.adjust {
            self.source.sleep(seconds);
            return;
        }

        let before = self.source.now();
        self.source.sleep(seconds);
        let elapsed = self.source.now() - before;

        let allowance = seconds * OVERRUN_FACTOR;
        if elapsed > allowance {
            let stalled = elapsed - allowance;
            self.adjusted_offset += stalled;
            warn!(
                "sleep of {:.2}s took {:.2}s; discounting {:.2}s of stalled time",
                seconds, elapsed, stalled
            );
        }
    }

    /// Total stall time discounted so far.
    pub fn adjusted_offset(&self) -> f64 {
        self.adjusted_offset
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::TimeSource;

    /// Manually driven time source. Sleeps advance time by the requested
    /// amount unless a stall has been queued for the next sleep.
    #[derive(Debug, Clone, Default)]
    pub struct ManualTime {
        now: Rc<Cell<f64>>,
        stalls: Rc<RefCell<VecDeque<f64>>>,
        sleeps: Rc<RefCell<Vec<f64>>>,
    }

    impl ManualTime {
        pub fn starting_at(seconds: f64) -> Self {
            let time = Self::default();
            time.now.set(seconds);
            time
        }

        /// Make the next sleep block for `actual` seconds regardless of the request.
        pub fn stall_next_sleep(&self, actual: f64) {
            self.stalls.borrow_mut().push_back(actual);
        }

        pub fn advance(&self, seconds: f64) {
            self.now.set(self.now.get() + seconds);
        }

        pub fn sleeps(&self) -> Vec<f64> {
            self.sleeps.borrow().clone()
        }

        pub fn shared_now(&self) -> Rc<Cell<f64>> {
            self.now.clone()
        }
    }

    impl TimeSource for ManualTime {
        fn now(&self) -> f64 {
            self.now.get()
        }

        fn sleep(&self, seconds: f64) {
            self.sleeps.borrow_mut().push(seconds);
            let actual = self.stalls.borrow_mut().pop_front().unwrap_or(seconds);
            self.advance(actual);
        }
    }
}
