//! # Sampling interval sources
//!
//! An interval ends either on a periodic timer tick or on the rising edge
//! of an external trigger input. Exactly one source is armed per channel;
//! the driver's constructors enforce the choice at the type level.

use crate::{
    channel::{ChannelState, Event},
    interrupt::{self, SourceId},
};

/// Contract of the platform's periodic timer service.
///
/// [`start`] must schedule each tick relative to the previous fire time,
/// not the previous completion, so intervals do not drift with handler
/// latency.
///
/// [`start`]: Self::start
pub trait SampleClock {
    /// Starts periodic firing every `period_ms` milliseconds.
    fn start(&mut self, period_ms: u32);

    /// Stops firing.
    fn cancel(&mut self);

    /// Interrupt source the tick fires on.
    fn source(&self) -> SourceId;
}

/// Contract of a GPIO edge interrupt used as an external trigger.
pub trait TriggerInput {
    /// Raw pin number. Pin 0 is reserved as the "no trigger" sentinel and
    /// must not be used as a trigger input.
    fn pin(&self) -> u8;

    /// Arms the rising-edge interrupt.
    fn listen_rising(&mut self);

    /// Disarms it.
    fn unlisten(&mut self);

    /// Interrupt source the trigger edges fire on.
    fn source(&self) -> SourceId;
}

/// One armed sampling source.
pub trait SampleSource {
    /// Arms the source onto `state`.
    fn arm(&mut self, state: &'static ChannelState);

    /// Disarms the source. Safe to call when not armed.
    fn disarm(&mut self);
}

/// Samples on an internal periodic timer.
pub struct Periodic<T: SampleClock> {
    clock: T,
    period_ms: u32,
}

impl<T: SampleClock> Periodic<T> {
    /// Samples every `period_ms` milliseconds. The period must be non-zero.
    pub fn new(clock: T, period_ms: u32) -> Self {
        assert!(period_ms > 0, "sampling period must be non-zero");
        Self { clock, period_ms }
    }
}

impl<T: SampleClock> SampleSource for Periodic<T> {
    fn arm(&mut self, state: &'static ChannelState) {
        interrupt::bind(self.clock.source(), state, Event::Sample);
        self.clock.start(self.period_ms);
        debug!("periodic sampling every {} ms", self.period_ms);
    }

    fn disarm(&mut self) {
        self.clock.cancel();
        interrupt::unbind(self.clock.source());
    }
}

/// Samples on the rising edge of an external trigger input.
pub struct ExternalTrigger<G: TriggerInput> {
    trigger: G,
}

impl<G: TriggerInput> ExternalTrigger<G> {
    /// Samples on every rising edge of `trigger`.
    pub fn new(trigger: G) -> Self {
        assert!(
            trigger.pin() != 0,
            "pin 0 is reserved as the no-trigger sentinel"
        );
        Self { trigger }
    }
}

impl<G: TriggerInput> SampleSource for ExternalTrigger<G> {
    fn arm(&mut self, state: &'static ChannelState) {
        interrupt::bind(self.trigger.source(), state, Event::Sample);
        self.trigger.listen_rising();
        debug!("external trigger sampling on pin {}", self.trigger.pin());
    }

    fn disarm(&mut self) {
        self.trigger.unlisten();
        interrupt::unbind(self.trigger.source());
    }
}
