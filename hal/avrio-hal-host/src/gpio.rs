//! Simulated GPIO

use portable_atomic::{AtomicU32, AtomicU8, Ordering};

use avrio_hal::{InputPin, InputPort, OutputPin};

/// Simulated 8-bit input port
///
/// Levels are set by the test or the simulation driver and read by
/// pin-change handlers. Pull-ups are modelled by the initial value.
#[derive(Debug, Default)]
pub struct SimPort {
    levels: AtomicU8,
}

impl SimPort {
    /// Create a port with the given initial levels
    pub const fn new(levels: u8) -> Self {
        Self {
            levels: AtomicU8::new(levels),
        }
    }

    /// Drive all 8 pins at once
    pub fn set_levels(&self, levels: u8) {
        self.levels.store(levels, Ordering::Release);
    }

    /// Drive a single pin
    pub fn set_pin(&self, bit: u8, high: bool) {
        let mask = 1u8 << (bit & 0x07);
        if high {
            self.levels.fetch_or(mask, Ordering::AcqRel);
        } else {
            self.levels.fetch_and(!mask, Ordering::AcqRel);
        }
    }
}

impl InputPort for SimPort {
    fn read(&self) -> u8 {
        self.levels.load(Ordering::Acquire)
    }
}

/// Simulated output pin
///
/// Counts every level transition, which is what tests usually assert on
/// (e.g. "the LED blinked 3 times").
#[derive(Debug, Default)]
pub struct SimPin {
    high: bool,
    transitions: AtomicU32,
}

impl SimPin {
    /// Create a pin driven low
    pub const fn new() -> Self {
        Self {
            high: false,
            transitions: AtomicU32::new(0),
        }
    }

    /// Number of level changes since creation
    pub fn transitions(&self) -> u32 {
        self.transitions.load(Ordering::Relaxed)
    }

    fn drive(&mut self, high: bool) {
        if self.high != high {
            self.high = high;
            self.transitions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl OutputPin for SimPin {
    fn set_high(&mut self) {
        self.drive(true);
    }

    fn set_low(&mut self) {
        self.drive(false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

impl InputPin for SimPin {
    fn is_high(&self) -> bool {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_levels() {
        let port = SimPort::new(0xFF);
        port.set_pin(3, false);
        assert_eq!(port.read(), 0xF7);
        port.set_pin(3, true);
        assert_eq!(port.read(), 0xFF);
        port.set_levels(0x0F);
        assert!(port.is_high(0));
        assert!(!port.is_high(4));
    }

    #[test]
    fn test_pin_counts_transitions() {
        let mut led = SimPin::new();
        led.toggle();
        led.toggle();
        led.set_low();
        assert_eq!(led.transitions(), 2);
        assert!(led.is_low());
    }
}
