//! # Per-channel shared state
//!
//! One [`ChannelState`] exists per measured signal. The caller places it in
//! a `static` and hands it to the driver; it is the only data shared
//! between interrupt context and foreground code, and the only state the
//! interrupt registry ever touches.

use crate::{accumulator::Accumulator, sampler::IntervalSampler};

/// Interrupt events a channel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The hardware counter wrapped past its 16-bit range.
    Wrap,
    /// One rising edge of the measured signal (per-edge backend only).
    Edge,
    /// The sampling interval elapsed (timer tick or external trigger edge).
    Sample,
}

/// Cross-context state of one measurement channel.
pub struct ChannelState {
    pub(crate) accumulator: Accumulator,
    pub(crate) sampler: IntervalSampler,
}

impl ChannelState {
    /// Creates an empty channel, ready to be placed in a `static`.
    pub const fn new() -> Self {
        Self {
            accumulator: Accumulator::new(),
            sampler: IntervalSampler::new(),
        }
    }

    /// Entry point for all interrupt trampolines of this channel.
    pub(crate) fn handle(&self, event: Event) {
        match event {
            Event::Wrap => self.accumulator.record_wrap(),
            Event::Edge => self.accumulator.record_edge(),
            Event::Sample => self.sampler.tick(self.accumulator.get()),
        }
    }

    pub(crate) fn reset(&self) {
        self.accumulator.reset();
        self.sampler.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_feed_the_right_component() {
        let channel = ChannelState::new();

        channel.handle(Event::Edge);
        channel.handle(Event::Edge);
        channel.handle(Event::Wrap);
        channel.handle(Event::Sample);

        assert!(channel.sampler.available());
        assert_eq!(channel.sampler.read(), (1 << 16) + 2);
    }

    #[test]
    fn reset_clears_both_components() {
        let channel = ChannelState::new();

        channel.handle(Event::Edge);
        channel.handle(Event::Sample);
        channel.reset();

        assert!(!channel.sampler.available());
        assert_eq!(channel.accumulator.get(), 0);
    }
}
