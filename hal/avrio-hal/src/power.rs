//! Idle strategies for the foreground loop
//!
//! The event loop blocks in exactly one place: waiting for the next event.
//! A port decides what "waiting" means there, from a plain spin to a sleep
//! instruction that the next interrupt wakes up from.

/// Wait until an interrupt may have produced new work
pub trait WaitForInterrupt {
    /// Block (or spin once) until the next interrupt
    ///
    /// Returning early is always allowed; callers re-check their queue.
    fn wait(&mut self);
}

impl<F: FnMut()> WaitForInterrupt for F {
    fn wait(&mut self) {
        self()
    }
}
