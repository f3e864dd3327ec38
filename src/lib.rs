//! Interval frequency / pulse-count driver.
//!
//! ## Overview
//! Measures how many rising edges a digital signal produces per interval.
//! Counting is done either by a vendor 16-bit edge-counter peripheral,
//! extended past its range in software with a rollover-safe accumulator, or
//! by servicing one interrupt per edge on parts without such a peripheral.
//! Intervals end on an internal periodic timer tick or on the rising edge
//! of an external trigger input; each completed interval publishes one
//! pulse count, consumed through [`FreqCount::read`] and flagged by
//! [`FreqCount::available`].
//!
//! Hardware access goes through small trait contracts ([`PulseCounter`],
//! [`EdgeInput`], [`SampleClock`], [`TriggerInput`]) implemented by
//! platform glue, which also forwards the relevant vendor interrupts to
//! [`dispatch`]. The driver core is platform independent.
//!
//! ## Usage
//!
//! ```rust,ignore
//! static CHANNEL: ChannelState = ChannelState::new();
//!
//! // Platform glue: counter peripheral on the signal pin, a periodic
//! // timer, and vendor ISRs that call `dispatch` with the matching ids.
//! let counter = PwmPulseCounter::new(signal_pin);
//! let clock = AlarmClock::new();
//!
//! let mut meter = FreqCount::begin_timer(
//!     &CHANNEL,
//!     HardwareBackend::new(counter),
//!     clock,
//!     1000,
//! );
//!
//! loop {
//!     if meter.available() {
//!         let pulses = meter.read();
//!         // pulses counted in the last 1000 ms
//!     }
//! }
//! ```
//!
//! ## Feature Flags
#![doc = document_features::document_features!()]
#![deny(missing_docs, rust_2018_idioms)]
#![no_std]

// MUST be the first module
mod fmt;

mod accumulator;
mod backend;
mod channel;
mod interrupt;
mod sampler;
mod timing;

pub use self::{
    accumulator::{Accumulator, RawCounter, DEFAULT_REREAD_BELOW, WRAP_STEP},
    backend::{
        edge::EdgeInput, hardware::PulseCounter, CountingBackend, EdgeBackend, HardwareBackend,
    },
    channel::{ChannelState, Event},
    interrupt::{dispatch, SourceId, SOURCE_COUNT},
    sampler::IntervalSampler,
    timing::{ExternalTrigger, Periodic, SampleClock, SampleSource, TriggerInput},
};

/// Frequency counter for one measurement channel.
///
/// Constructed through [`begin_timer`] or [`begin_ext_trig`], which arm the
/// counting backend and exactly one sampling source. Dropping the driver
/// tears the channel down again.
///
/// [`begin_timer`]: Self::begin_timer
/// [`begin_ext_trig`]: Self::begin_ext_trig
pub struct FreqCount<B: CountingBackend, S: SampleSource> {
    state: &'static ChannelState,
    backend: B,
    source: S,
    armed: bool,
}

impl<B: CountingBackend, T: SampleClock> FreqCount<B, Periodic<T>> {
    /// Starts measuring with an internal periodic timer.
    ///
    /// Resets all channel state, arms the counting backend on the signal
    /// input it was configured with, and schedules a sample every
    /// `period_ms` milliseconds. A zero period is a configuration fault and
    /// panics.
    pub fn begin_timer(
        state: &'static ChannelState,
        backend: B,
        clock: T,
        period_ms: u32,
    ) -> Self {
        Self::begin(state, backend, Periodic::new(clock, period_ms))
    }
}

impl<B: CountingBackend, G: TriggerInput> FreqCount<B, ExternalTrigger<G>> {
    /// Starts measuring between rising edges of an external trigger input.
    ///
    /// Resets all channel state and arms the counting backend; each trigger
    /// edge closes the current interval and publishes its pulse count. Pin
    /// 0 is reserved as the "no trigger" sentinel; passing it is a
    /// configuration fault and panics.
    pub fn begin_ext_trig(state: &'static ChannelState, backend: B, trigger: G) -> Self {
        Self::begin(state, backend, ExternalTrigger::new(trigger))
    }
}

impl<B: CountingBackend, S: SampleSource> FreqCount<B, S> {
    fn begin(state: &'static ChannelState, mut backend: B, mut source: S) -> Self {
        state.reset();
        backend.arm(state);
        source.arm(state);
        info!("channel armed");

        Self {
            state,
            backend,
            source,
            armed: true,
        }
    }

    /// Whether an unread sample is available.
    pub fn available(&self) -> bool {
        self.state.sampler.available()
    }

    /// Returns the most recent interval's pulse count and clears the ready
    /// flag.
    ///
    /// Without a new sample this returns the previous value again, with no
    /// staleness signal of its own; gate on [`available`](Self::available)
    /// to tell the difference.
    pub fn read(&mut self) -> u32 {
        self.state.sampler.read()
    }

    /// Direct access to the counting backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stops measuring.
    ///
    /// Disarms the sampling source and the counting backend; no handler
    /// fires for this channel once `end` returns. The last published sample
    /// stays readable. Safe to call more than once.
    pub fn end(&mut self) {
        if self.armed {
            self.source.disarm();
            self.backend.disarm();
            self.armed = false;
            info!("channel disarmed");
        }
    }
}

impl<B: CountingBackend, S: SampleSource> Drop for FreqCount<B, S> {
    fn drop(&mut self) {
        self.end();
    }
}
