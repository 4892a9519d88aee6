//! Pin-change interrupts as events
//!
//! A pin-change interrupt covers a whole 8-bit port and does not say which
//! pin changed. The handler reads the port and pushes a
//! [`PIN_CHANGE`](EventType::PIN_CHANGE) event carrying all 8 levels.

use portable_atomic::{AtomicU8, Ordering};

use avrio_hal::InputPort;

use crate::event::{Event, EventType};
use crate::isr::InterruptHandler;
use crate::queue::SharedQueue;

/// Pushes the port levels whenever an enabled pin changes
pub struct PinChangeEvents<'q, P: InputPort, T: Copy, const N: usize> {
    port: P,
    queue: &'q SharedQueue<Event<T>, N>,
    /// Pins that trigger events (the PCMSKn register)
    enabled: AtomicU8,
    /// Levels seen by the previous interrupt
    last: AtomicU8,
}

impl<'q, P: InputPort, T: Copy + From<u8>, const N: usize> PinChangeEvents<'q, P, T, N> {
    /// Source with no pin enabled
    pub const fn new(port: P, queue: &'q SharedQueue<Event<T>, N>) -> Self {
        Self {
            port,
            queue,
            enabled: AtomicU8::new(0),
            last: AtomicU8::new(0),
        }
    }

    /// Latch the current levels and enable the pins in `mask`
    pub fn begin(&self, mask: u8) {
        self.last.store(self.port.read(), Ordering::Relaxed);
        self.enabled.store(mask, Ordering::Release);
    }

    pub fn enable_pins(&self, mask: u8) {
        self.enabled.fetch_or(mask, Ordering::AcqRel);
    }

    pub fn disable_pins(&self, mask: u8) {
        self.enabled.fetch_and(!mask, Ordering::AcqRel);
    }

    /// Pins currently enabled
    pub fn enabled_pins(&self) -> u8 {
        self.enabled.load(Ordering::Acquire)
    }

    /// Pin-change interrupt body
    ///
    /// Returns `true` if an event was queued.
    pub fn on_change(&self) -> bool {
        let levels = self.port.read();
        let previous = self.last.swap(levels, Ordering::AcqRel);
        if (levels ^ previous) & self.enabled_pins() == 0 {
            return false;
        }
        self.queue
            .push(Event::new(EventType::PIN_CHANGE, T::from(levels)))
    }
}

impl<P: InputPort, T: Copy + From<u8>, const N: usize> InterruptHandler
    for PinChangeEvents<'_, P, T, N>
{
    fn on_interrupt(&self) {
        self.on_change();
    }
}
