//! Per-edge interrupt backend.
//!
//! For parts without an edge-counting peripheral the signal itself is
//! routed to an interrupt line and every rising edge increments the
//! extended count directly. The cost is one interrupt per pulse, which
//! bounds the usable input frequency well below the hardware backend's.

use super::CountingBackend;
use crate::{
    channel::{ChannelState, Event},
    interrupt::{self, SourceId},
};

/// Contract of a per-edge interrupt source on the signal pin.
pub trait EdgeInput {
    /// Arms the rising-edge interrupt.
    fn listen_rising(&mut self);

    /// Disarms it.
    fn unlisten(&mut self);

    /// Interrupt source the edges fire on.
    fn source(&self) -> SourceId;
}

/// Counts by servicing one interrupt per rising edge.
pub struct EdgeBackend<I: EdgeInput> {
    input: I,
    state: Option<&'static ChannelState>,
}

impl<I: EdgeInput> EdgeBackend<I> {
    /// Creates a backend over a configured edge-interrupt input.
    pub fn new(input: I) -> Self {
        Self { input, state: None }
    }
}

impl<I: EdgeInput> CountingBackend for EdgeBackend<I> {
    fn arm(&mut self, state: &'static ChannelState) {
        self.state = Some(state);
        interrupt::bind(self.input.source(), state, Event::Edge);
        self.input.listen_rising();
        debug!("edge counting armed");
    }

    fn disarm(&mut self) {
        if self.state.take().is_some() {
            self.input.unlisten();
            interrupt::unbind(self.input.source());
            debug!("edge counting disarmed");
        }
    }

    fn sample(&self) -> u32 {
        match self.state {
            Some(state) => state.accumulator.get(),
            None => 0,
        }
    }

    fn reset(&mut self) {
        if let Some(state) = self.state {
            state.accumulator.reset();
        }
    }
}
