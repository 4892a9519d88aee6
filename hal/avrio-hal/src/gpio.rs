//! GPIO pin and port abstractions
//!
//! Pins are used by jobs and handlers to drive outputs; ports are sampled
//! by pin-change interrupt sources, which report all 8 levels at once.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// 8-bit input port (the PINx register of an AVR port)
///
/// Must be cheap enough to call from an interrupt handler.
pub trait InputPort {
    /// Read the levels of all 8 pins, bit `n` being pin `n`
    fn read(&self) -> u8;

    /// Check a single pin level
    fn is_high(&self, bit: u8) -> bool {
        self.read() & (1 << (bit & 0x07)) != 0
    }
}

// Blanket implementation so a port reference can be handed to a source
impl<P: InputPort + ?Sized> InputPort for &P {
    fn read(&self) -> u8 {
        (**self).read()
    }
}
