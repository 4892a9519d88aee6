//! Millisecond time sources

use avrio_hal::WaitForInterrupt;

/// Anything that counts milliseconds
///
/// Implemented by the [`Scheduler`](crate::Scheduler) and by the clock
/// sources in [`sources`](crate::sources). The count wraps after about 49
/// days.
pub trait Clock {
    /// Milliseconds since start or the last reset
    fn millis(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn millis(&self) -> u32 {
        (**self).millis()
    }
}

/// Busy-wait until `ms` milliseconds of `clock` time have passed
///
/// `idle` runs between checks; on target it sleeps until the next
/// interrupt, which is what advances the clock. Must not be called from an
/// interrupt handler.
pub fn delay<C, W>(clock: &C, ms: u32, idle: &mut W)
where
    C: Clock + ?Sized,
    W: WaitForInterrupt + ?Sized,
{
    let start = clock.millis();
    while clock.millis().wrapping_sub(start) < ms {
        idle.wait();
    }
}
