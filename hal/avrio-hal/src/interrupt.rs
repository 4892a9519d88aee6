//! Global interrupt-enable flag
//!
//! On AVR this is the `I` bit of `SREG` (`cli`/`sei`). A port implements
//! [`InterruptControl`] for whatever plays that role on its target; the
//! scoped guard in `avrio-core::sync` is built on top of it.

/// Control over the global interrupt-enable flag
///
/// `disable` must read and clear the flag as one atomic step, so that an
/// interrupt cannot slip in between the read and the clear.
pub trait InterruptControl {
    /// Clear the interrupt-enable flag, returning whether it was set before
    fn disable(&self) -> bool;

    /// Put the flag back to a state previously returned by [`disable`]
    ///
    /// Must never enable interrupts when `was_enabled` is false.
    ///
    /// [`disable`]: InterruptControl::disable
    fn restore(&self, was_enabled: bool);

    /// Unconditionally set the interrupt-enable flag (`sei`)
    fn enable(&self);

    /// Check whether interrupts are currently enabled
    fn is_enabled(&self) -> bool;
}

impl<I: InterruptControl + ?Sized> InterruptControl for &I {
    fn disable(&self) -> bool {
        (**self).disable()
    }

    fn restore(&self, was_enabled: bool) {
        (**self).restore(was_enabled)
    }

    fn enable(&self) {
        (**self).enable()
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}
