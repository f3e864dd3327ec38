//! Hardware-counter backend.

use super::CountingBackend;
use crate::{
    accumulator::{RawCounter, DEFAULT_REREAD_BELOW},
    channel::{ChannelState, Event},
    interrupt::{self, SourceId},
};

/// Contract of a vendor 16-bit edge-counting peripheral.
///
/// One implementation exists per platform. It is configured onto the signal
/// pin before being handed to the driver and must treat a signal pin the
/// peripheral cannot observe as a fatal configuration fault (on the RP2040,
/// for example, only PWM B pins can count).
pub trait PulseCounter {
    /// Starts the counter.
    fn enable(&mut self);

    /// Stops the counter.
    fn disable(&mut self);

    /// Resets the count register to zero.
    fn clear(&mut self);

    /// Arms the wraparound notification interrupt.
    fn listen_wrap(&mut self);

    /// Disarms the wraparound notification interrupt.
    fn unlisten_wrap(&mut self);

    /// Interrupt source the wraparound notification fires on.
    fn wrap_source(&self) -> SourceId;

    /// ISR-safe view of the raw count register.
    fn raw(&self) -> &'static dyn RawCounter;
}

/// Counts with a hardware peripheral, extended past 16 bits in software.
pub struct HardwareBackend<C: PulseCounter> {
    counter: C,
    reread_below: u16,
    state: Option<&'static ChannelState>,
}

impl<C: PulseCounter> HardwareBackend<C> {
    /// Creates a backend over a configured counter peripheral.
    pub fn new(counter: C) -> Self {
        Self {
            counter,
            reread_below: DEFAULT_REREAD_BELOW,
            state: None,
        }
    }

    /// Overrides the rollover re-read threshold.
    ///
    /// A sample that finds the raw register below this value re-reads the
    /// wrap accumulator to cover the window between hardware rollover and
    /// the serviced notification. The right margin depends on worst-case
    /// interrupt latency relative to the input's pulse rate; the default of
    /// [`DEFAULT_REREAD_BELOW`] counts was tuned on one platform and does
    /// not automatically carry over to others.
    pub fn with_reread_below(mut self, threshold: u16) -> Self {
        self.reread_below = threshold;
        self
    }
}

impl<C: PulseCounter> CountingBackend for HardwareBackend<C> {
    fn arm(&mut self, state: &'static ChannelState) {
        self.state = Some(state);
        self.counter.disable();
        self.counter.clear();
        state
            .accumulator
            .bind_raw(self.counter.raw(), self.reread_below);
        interrupt::bind(self.counter.wrap_source(), state, Event::Wrap);
        self.counter.listen_wrap();
        self.counter.enable();
        debug!("hardware counter armed");
    }

    fn disarm(&mut self) {
        if let Some(state) = self.state.take() {
            self.counter.unlisten_wrap();
            self.counter.disable();
            interrupt::unbind(self.counter.wrap_source());
            state.accumulator.unbind_raw();
            debug!("hardware counter disarmed");
        }
    }

    fn sample(&self) -> u32 {
        match self.state {
            Some(state) => state.accumulator.get(),
            None => 0,
        }
    }

    fn reset(&mut self) {
        self.counter.clear();
        if let Some(state) = self.state {
            state.accumulator.reset();
        }
    }
}
