//! # Interrupt source registry
//!
//! ## Overview
//! Trampolines installed in a vendor interrupt controller cannot capture
//! state, so channels are looked up through a fixed table indexed by
//! [`SourceId`]. Platform glue forwards every hardware interrupt handed to
//! this driver to [`dispatch`]; registration happens inside the driver at
//! `begin*` time and is removed again at `end()`, after which the source no
//! longer reaches the channel.
//!
//! Registration is exclusive: claiming a source that is already bound is a
//! configuration fault and panics, mirroring exclusive-handler semantics of
//! the underlying interrupt controllers.

use core::cell::Cell;

use critical_section::Mutex;

use crate::channel::{ChannelState, Event};

/// Number of interrupt source slots in the registry.
///
/// Sized after a small vendor interrupt controller; the RP2040, for one,
/// exposes 32 IRQ lines.
pub const SOURCE_COUNT: usize = 32;

/// Identifies one hardware interrupt source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SourceId(u8);

impl SourceId {
    /// Creates a source id. Panics when `id` is outside the registry range.
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < SOURCE_COUNT, "interrupt source out of range");
        Self(id)
    }

    /// The raw source number.
    pub const fn number(self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy)]
struct Binding {
    state: &'static ChannelState,
    event: Event,
}

type Slot = Mutex<Cell<Option<Binding>>>;

#[allow(clippy::declare_interior_mutable_const)]
const FREE: Slot = Mutex::new(Cell::new(None));

static REGISTRY: [Slot; SOURCE_COUNT] = [FREE; SOURCE_COUNT];

/// Registers `state` to service `id`.
pub(crate) fn bind(id: SourceId, state: &'static ChannelState, event: Event) {
    critical_section::with(|cs| {
        let slot = REGISTRY[id.index()].borrow(cs);
        assert!(
            slot.get().is_none(),
            "interrupt source already claimed by another channel"
        );
        slot.set(Some(Binding { state, event }));
    });
    trace!("bound interrupt source {}", id.number());
}

/// Releases `id` again. Releasing an unbound source is a no-op.
pub(crate) fn unbind(id: SourceId) {
    critical_section::with(|cs| REGISTRY[id.index()].borrow(cs).set(None));
    trace!("released interrupt source {}", id.number());
}

/// Forwards a hardware interrupt to the channel registered for `id`.
///
/// Call this from the vendor trampoline of every source handed to the
/// driver. A source with no registration is ignored; a spurious interrupt
/// is not an error.
pub fn dispatch(id: SourceId) {
    let binding = critical_section::with(|cs| REGISTRY[id.index()].borrow(cs).get());
    if let Some(binding) = binding {
        binding.state.handle(binding.event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test claims its own source ids: the registry is process-global
    // and the harness runs tests in parallel.

    #[test]
    fn dispatch_reaches_the_bound_channel() {
        static STATE: ChannelState = ChannelState::new();
        let id = SourceId::new(0);

        bind(id, &STATE, Event::Edge);
        dispatch(id);
        dispatch(id);

        assert_eq!(STATE.accumulator.get(), 2);
        unbind(id);
    }

    #[test]
    fn dispatch_ignores_unbound_sources() {
        dispatch(SourceId::new(1));
    }

    #[test]
    fn unbind_silences_the_source() {
        static STATE: ChannelState = ChannelState::new();
        let id = SourceId::new(2);

        bind(id, &STATE, Event::Edge);
        dispatch(id);
        unbind(id);
        dispatch(id);

        assert_eq!(STATE.accumulator.get(), 1);
    }

    #[test]
    #[should_panic(expected = "already claimed")]
    fn binding_a_claimed_source_panics() {
        static STATE: ChannelState = ChannelState::new();
        let id = SourceId::new(3);

        bind(id, &STATE, Event::Wrap);
        bind(id, &STATE, Event::Sample);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_source_panics() {
        let _ = SourceId::new(SOURCE_COUNT as u8);
    }
}
