//! Foreground event handlers of the demo

use std::cell::{Cell, RefCell};

use log::debug;

use avrio_core::event::{Event, EventHandler, EventType};
use avrio_hal::OutputPin;
use avrio_hal_host::SimPin;

/// Toggles an LED on every button press seen in `PIN_CHANGE` events
///
/// Buttons pull their pin low; a press is a high to low transition of an
/// enabled pin between two consecutive port snapshots.
pub struct ButtonHandler {
    mask: u8,
    /// Levels from the previous event (pull-ups: all high)
    last: Cell<u8>,
    presses: Cell<u32>,
    led: RefCell<SimPin>,
}

impl ButtonHandler {
    /// Watch the pins in `mask`
    pub fn new(mask: u8) -> Self {
        Self {
            mask,
            last: Cell::new(0xFF),
            presses: Cell::new(0),
            led: RefCell::new(SimPin::new()),
        }
    }

    pub fn presses(&self) -> u32 {
        self.presses.get()
    }

    pub fn transitions(&self) -> u32 {
        self.led.borrow().transitions()
    }
}

impl EventHandler<u8> for ButtonHandler {
    fn event_type(&self) -> EventType {
        EventType::PIN_CHANGE
    }

    fn on_event(&self, event: &Event<u8>) {
        let levels = event.value();
        let pressed = self.last.replace(levels) & !levels & self.mask;
        for pin in (0..8).filter(|pin| pressed & (1 << pin) != 0) {
            debug!("button on pin {} pressed", pin);
            self.presses.set(self.presses.get() + 1);
            self.led.borrow_mut().toggle();
        }
    }
}

/// Counts `EXT_INTERRUPT` events
#[derive(Default)]
pub struct ExternalCounter {
    count: Cell<u32>,
}

impl ExternalCounter {
    pub fn count(&self) -> u32 {
        self.count.get()
    }
}

impl EventHandler<u8> for ExternalCounter {
    fn event_type(&self) -> EventType {
        EventType::EXT_INTERRUPT
    }

    fn on_event(&self, event: &Event<u8>) {
        self.count.set(self.count.get() + 1);
        debug!("INT0 fired, PD2 level {}", event.value());
    }
}
