//! # Interval sampling
//!
//! Converts absolute extended counts into "pulses since the previous
//! sample" and publishes one result per completed interval, flagged until
//! the consumer picks it up.

use core::cell::Cell;

use critical_section::Mutex;
use portable_atomic::{AtomicBool, Ordering};

/// Publishes the pulse count of each completed interval.
pub struct IntervalSampler {
    last_count: Mutex<Cell<u32>>,
    frequency: Mutex<Cell<u32>>,
    ready: AtomicBool,
}

impl IntervalSampler {
    /// Creates an idle sampler, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            last_count: Mutex::new(Cell::new(0)),
            frequency: Mutex::new(Cell::new(0)),
            ready: AtomicBool::new(false),
        }
    }

    /// Completes an interval at the given absolute count.
    ///
    /// Called from the sampling interrupt (timer tick or trigger edge). The
    /// delta uses wrapping subtraction, so it stays correct when the
    /// extended count itself wraps past `u32::MAX` between two samples, as
    /// long as no interval spans more than 2^32 pulses.
    pub fn tick(&self, current: u32) {
        critical_section::with(|cs| {
            let last = self.last_count.borrow(cs);
            let delta = current.wrapping_sub(last.get());
            last.set(current);
            self.frequency.borrow(cs).set(delta);
        });
        self.ready.store(true, Ordering::Release);
    }

    /// Whether an unread sample is available.
    pub fn available(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Returns the latest sample and clears the ready flag.
    ///
    /// Reading again before the next interval completes returns the same
    /// value with no staleness signal; gate on [`available`] to tell fresh
    /// from stale.
    ///
    /// [`available`]: Self::available
    pub fn read(&self) -> u32 {
        critical_section::with(|cs| {
            self.ready.store(false, Ordering::Relaxed);
            self.frequency.borrow(cs).get()
        })
    }

    /// Clears the sampler back to its idle state.
    pub fn reset(&self) {
        critical_section::with(|cs| {
            self.last_count.borrow(cs).set(0);
            self.frequency.borrow(cs).set(0);
        });
        self.ready.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_correct_across_the_count_wrap() {
        let sampler = IntervalSampler::new();

        sampler.tick(0xFFFF_FFF0);
        sampler.read();

        sampler.tick(0x0000_0005);
        assert_eq!(sampler.read(), 0x15);
    }

    #[test]
    fn ready_flag_follows_tick_and_read() {
        let sampler = IntervalSampler::new();
        assert!(!sampler.available());

        sampler.tick(42);
        assert!(sampler.available());

        assert_eq!(sampler.read(), 42);
        assert!(!sampler.available());
    }

    #[test]
    fn stale_read_repeats_the_previous_value() {
        let sampler = IntervalSampler::new();

        sampler.tick(7);
        assert_eq!(sampler.read(), 7);

        // No new sample: the old value comes back, still not flagged.
        assert_eq!(sampler.read(), 7);
        assert!(!sampler.available());
    }

    #[test]
    fn consecutive_intervals_report_their_own_deltas() {
        let sampler = IntervalSampler::new();

        sampler.tick(440);
        assert_eq!(sampler.read(), 440);

        sampler.tick(440 + 880);
        assert_eq!(sampler.read(), 880);
    }

    #[test]
    fn reset_returns_to_idle() {
        let sampler = IntervalSampler::new();

        sampler.tick(99);
        sampler.reset();

        assert!(!sampler.available());
        assert_eq!(sampler.read(), 0);
    }
}
