//! # Rollover-safe pulse accumulation
//!
//! ## Overview
//! Hardware edge counters are typically 16 bits wide and free-run, wrapping
//! every 65536 pulses. [`Accumulator`] extends such a counter to 32 bits by
//! folding each wraparound notification into a software-held high part and
//! combining it with the raw register value on demand.
//!
//! The combination is ordering-sensitive: a sample taken in the window
//! between the hardware rollover and the serviced notification would miss a
//! whole wrap. [`Accumulator::get`] closes that window by re-reading the
//! high part whenever the raw value looks freshly rolled over.

use core::cell::Cell;

use critical_section::Mutex;
use portable_atomic::{AtomicU16, AtomicU32, Ordering};

/// Amount added to the extended count for every hardware wraparound.
pub const WRAP_STEP: u32 = 1 << 16;

/// Default rollover re-read threshold, see [`Accumulator::get`].
pub const DEFAULT_REREAD_BELOW: u16 = 100;

/// ISR-safe read access to the raw 16-bit count register.
pub trait RawCounter: Sync {
    /// Current value of the free-running counter.
    fn value(&self) -> u16;
}

/// Software 32-bit extension of a wrapping 16-bit hardware counter.
///
/// Also serves as the plain pulse counter for the per-edge backend, which
/// never attaches a raw register view.
pub struct Accumulator {
    count: AtomicU32,
    raw: Mutex<Cell<Option<&'static dyn RawCounter>>>,
    reread_below: AtomicU16,
}

impl Accumulator {
    /// Creates an empty accumulator, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            raw: Mutex::new(Cell::new(None)),
            reread_below: AtomicU16::new(DEFAULT_REREAD_BELOW),
        }
    }

    /// Attaches the raw register view of a hardware counter.
    pub(crate) fn bind_raw(&self, raw: &'static dyn RawCounter, reread_below: u16) {
        self.reread_below.store(reread_below, Ordering::Relaxed);
        critical_section::with(|cs| self.raw.borrow(cs).set(Some(raw)));
    }

    /// Detaches the raw register view again.
    pub(crate) fn unbind_raw(&self) {
        critical_section::with(|cs| self.raw.borrow(cs).set(None));
    }

    /// Folds one hardware wraparound into the high part.
    ///
    /// Called from the wraparound interrupt, once per 65536 pulses.
    pub fn record_wrap(&self) {
        self.count.fetch_add(WRAP_STEP, Ordering::Relaxed);
    }

    /// Counts a single edge.
    ///
    /// Called from the per-edge interrupt on parts without a counting
    /// peripheral.
    pub fn record_edge(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Current extended count.
    ///
    /// Reads the high part, then the raw register. A raw value below the
    /// configured threshold may mean the register rolled over after the high
    /// part was read but before the wrap notification was serviced, so the
    /// high part is read again in that case. The window this closes is
    /// bounded by interrupt latency; the threshold is a margin, not an exact
    /// figure.
    pub fn get(&self) -> u32 {
        let raw = critical_section::with(|cs| self.raw.borrow(cs).get());
        let Some(reg) = raw else {
            return self.count.load(Ordering::Relaxed);
        };

        let mut count = self.count.load(Ordering::Relaxed);
        let part = reg.value();
        if part < self.reread_below.load(Ordering::Relaxed) {
            // The register may just have rolled over with the wrap
            // notification still pending; pick up the serviced wrap.
            count = self.count.load(Ordering::Relaxed);
        }
        count.wrapping_add(u32::from(part))
    }

    /// Clears the accumulated high part.
    ///
    /// The raw hardware register is cleared by its owner, not here.
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}
