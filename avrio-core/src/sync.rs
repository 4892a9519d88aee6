//! Scoped critical sections
//!
//! A [`Synchronized`] guard clears the global interrupt flag when created
//! and puts back exactly what it found when dropped, on every exit path.
//! Guards nest: an inner guard finds interrupts already disabled and so
//! leaves them disabled; only the outermost guard re-enables them.

use avrio_hal::InterruptControl;

/// RAII critical section over an [`InterruptControl`]
#[must_use = "interrupts are re-enabled as soon as the guard is dropped"]
pub struct Synchronized<'a, I: InterruptControl + ?Sized> {
    irq: &'a I,
    was_enabled: bool,
}

impl<'a, I: InterruptControl + ?Sized> Synchronized<'a, I> {
    /// Disable interrupts until the returned guard is dropped
    pub fn new(irq: &'a I) -> Self {
        let was_enabled = irq.disable();
        Self { irq, was_enabled }
    }

    /// Whether interrupts were enabled when the guard was created
    pub fn was_enabled(&self) -> bool {
        self.was_enabled
    }
}

impl<I: InterruptControl + ?Sized> Drop for Synchronized<'_, I> {
    fn drop(&mut self) {
        self.irq.restore(self.was_enabled);
    }
}

impl<I: InterruptControl + ?Sized> core::fmt::Debug for Synchronized<'_, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Synchronized")
            .field("was_enabled", &self.was_enabled)
            .finish()
    }
}

/// Run `f` with interrupts disabled, then restore the previous state
pub fn synchronized<I, R>(irq: &I, f: impl FnOnce() -> R) -> R
where
    I: InterruptControl + ?Sized,
{
    let _guard = Synchronized::new(irq);
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use avrio_hal_host::SimInterrupts;

    #[test]
    fn test_restores_enabled() {
        let irq = SimInterrupts::enabled();
        {
            let guard = Synchronized::new(&irq);
            assert!(guard.was_enabled());
            assert!(!irq.is_enabled());
        }
        assert!(irq.is_enabled());
    }

    #[test]
    fn test_keeps_disabled() {
        let irq = SimInterrupts::new();
        {
            let guard = Synchronized::new(&irq);
            assert!(!guard.was_enabled());
        }
        assert!(!irq.is_enabled());
    }

    #[test]
    fn test_nested_restores_outermost_state() {
        let irq = SimInterrupts::enabled();
        {
            let _outer = Synchronized::new(&irq);
            {
                let inner = Synchronized::new(&irq);
                assert!(!inner.was_enabled());
            }
            // Leaving the inner guard must not re-enable
            assert!(!irq.is_enabled());
        }
        assert!(irq.is_enabled());

        let irq = SimInterrupts::new();
        {
            let _outer = Synchronized::new(&irq);
            let _inner = Synchronized::new(&irq);
        }
        assert!(!irq.is_enabled());
    }

    #[test]
    fn test_restores_on_early_return() {
        fn bail(irq: &SimInterrupts) -> Result<(), ()> {
            let _guard = Synchronized::new(irq);
            let step: Result<(), ()> = Err(());
            step?;
            Ok(())
        }

        let irq = SimInterrupts::enabled();
        assert!(bail(&irq).is_err());
        assert!(irq.is_enabled());
    }

    #[test]
    fn test_restores_on_unwind() {
        let irq = SimInterrupts::enabled();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            synchronized(&irq, || panic!("handler failed"))
        }));
        assert!(result.is_err());
        assert!(irq.is_enabled());
    }

    #[test]
    fn test_synchronized_returns_value() {
        let irq = SimInterrupts::enabled();
        let seen = synchronized(&irq, || irq.is_enabled());
        assert!(!seen);
        assert!(irq.is_enabled());
    }
}
