//! External interrupts (INT0, INT1) as events

use portable_atomic::{AtomicBool, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use avrio_hal::InputPort;

use crate::event::{Event, EventType};
use crate::isr::InterruptHandler;
use crate::queue::SharedQueue;

/// Condition that raises an external interrupt (EICRA ISCn bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum InterruptTrigger {
    /// While the pin is low
    LowLevel = 0,
    AnyChange = 1,
    #[default]
    FallingEdge = 2,
    RisingEdge = 3,
}

impl InterruptTrigger {
    /// ISCn1:ISCn0 value
    pub const fn sense_bits(self) -> u8 {
        self as u8
    }

    /// Check if going from `previous` to `current` level raises the interrupt
    pub const fn fires(self, previous: bool, current: bool) -> bool {
        match self {
            Self::LowLevel => !current,
            Self::AnyChange => previous != current,
            Self::FallingEdge => previous && !current,
            Self::RisingEdge => !previous && current,
        }
    }
}

/// Pushes an `EXT_INTERRUPT` event with the pin level on each trigger
pub struct ExternalInterruptEvents<'q, P: InputPort, T: Copy, const N: usize> {
    port: P,
    bit: u8,
    trigger: InterruptTrigger,
    queue: &'q SharedQueue<Event<T>, N>,
    last: AtomicBool,
}

impl<'q, P: InputPort, T: Copy + From<u8>, const N: usize> ExternalInterruptEvents<'q, P, T, N> {
    /// Watch pin `bit` of `port`
    pub const fn new(
        port: P,
        bit: u8,
        trigger: InterruptTrigger,
        queue: &'q SharedQueue<Event<T>, N>,
    ) -> Self {
        Self {
            port,
            bit,
            trigger,
            queue,
            last: AtomicBool::new(true),
        }
    }

    pub fn trigger(&self) -> InterruptTrigger {
        self.trigger
    }

    /// Latch the current pin level
    pub fn begin(&self) {
        self.last.store(self.port.is_high(self.bit), Ordering::Relaxed);
    }

    /// Interrupt body
    ///
    /// Returns `true` if an event was queued.
    pub fn on_trigger(&self) -> bool {
        let level = self.port.is_high(self.bit);
        let previous = self.last.swap(level, Ordering::AcqRel);
        if !self.trigger.fires(previous, level) {
            return false;
        }
        self.queue
            .push(Event::new(EventType::EXT_INTERRUPT, T::from(level as u8)))
    }
}

impl<P: InputPort, T: Copy + From<u8>, const N: usize> InterruptHandler
    for ExternalInterruptEvents<'_, P, T, N>
{
    fn on_interrupt(&self) {
        self.on_trigger();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avrio_hal_host::SimPort;

    #[test]
    fn test_trigger_conditions() {
        use InterruptTrigger::*;
        assert!(FallingEdge.fires(true, false));
        assert!(!FallingEdge.fires(false, true));
        assert!(RisingEdge.fires(false, true));
        assert!(AnyChange.fires(true, false) && AnyChange.fires(false, true));
        assert!(!AnyChange.fires(true, true));
        assert!(LowLevel.fires(false, false));
        assert!(!LowLevel.fires(false, true));
        assert_eq!(RisingEdge.sense_bits(), 0b11);
    }

    #[test]
    fn test_falling_edge_events() {
        // INT0 is PD2
        let port = SimPort::new(0b0000_0100);
        let queue: SharedQueue<Event<u8>, 8> = SharedQueue::new();
        let int0 = ExternalInterruptEvents::new(&port, 2, InterruptTrigger::FallingEdge, &queue);
        int0.begin();

        port.set_pin(2, false);
        int0.on_interrupt();
        port.set_pin(2, true);
        int0.on_interrupt();
        port.set_pin(2, false);
        int0.on_interrupt();

        assert_eq!(queue.len(), 2);
        let event = queue.pop().unwrap();
        assert_eq!(event.kind(), EventType::EXT_INTERRUPT);
        assert_eq!(event.value(), 0);
    }
}
