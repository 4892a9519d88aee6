//! Simulated global interrupt flag

use portable_atomic::{AtomicBool, Ordering};

use avrio_hal::InterruptControl;

/// Simulated `SREG.I` bit
///
/// Starts disabled, like an AVR coming out of reset.
#[derive(Debug, Default)]
pub struct SimInterrupts {
    enabled: AtomicBool,
}

impl SimInterrupts {
    /// Create a flag with interrupts disabled
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
        }
    }

    /// Create a flag with interrupts already enabled
    pub const fn enabled() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }
}

impl InterruptControl for SimInterrupts {
    fn disable(&self) -> bool {
        self.enabled.swap(false, Ordering::AcqRel)
    }

    fn restore(&self, was_enabled: bool) {
        if was_enabled {
            self.enabled.store(true, Ordering::Release);
        }
    }

    fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disabled() {
        let irq = SimInterrupts::new();
        assert!(!irq.is_enabled());
        assert!(SimInterrupts::enabled().is_enabled());
    }

    #[test]
    fn test_disable_reports_previous_state() {
        let irq = SimInterrupts::enabled();
        assert!(irq.disable());
        assert!(!irq.is_enabled());
        assert!(!irq.disable());
    }

    #[test]
    fn test_restore_never_enables_spuriously() {
        let irq = SimInterrupts::new();
        irq.restore(false);
        assert!(!irq.is_enabled());

        irq.enable();
        let prior = irq.disable();
        irq.restore(prior);
        assert!(irq.is_enabled());
    }
}
