//! Ring buffer shared between interrupt and foreground code
//!
//! Every operation runs inside a critical section, so a push from an
//! interrupt handler can never observe a half-updated head/tail pair.
//!
//! The critical section comes from the `critical-section` implementation
//! linked into the final binary. On the MCU that implementation is the
//! port's [`InterruptControl`](avrio_hal::InterruptControl): save `SREG`,
//! `cli`, restore. It therefore nests with [`Synchronized`](crate::Synchronized)
//! guards in either order, and leaves the interrupt flag exactly as it
//! found it. Host builds link the `std` implementation instead, which
//! locks a mutex and does not touch a simulated interrupt flag.

use core::cell::RefCell;

use avrio_hal::WaitForInterrupt;
use critical_section::Mutex;

use super::Queue;

/// Interrupt-safe queue, usable as a `static`
///
/// ```
/// use avrio_core::{Event, EventType, SharedQueue};
///
/// static EVENTS: SharedQueue<Event, 32> = SharedQueue::new();
///
/// // Interrupt side
/// EVENTS.push(Event::signal(EventType::WDT_TIMER));
///
/// // Foreground side
/// assert_eq!(EVENTS.pop().map(|e| e.kind()), Some(EventType::WDT_TIMER));
/// ```
pub struct SharedQueue<T, const N: usize> {
    inner: Mutex<RefCell<Queue<T, N>>>,
}

impl<T: Copy, const N: usize> SharedQueue<T, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Queue::new())),
        }
    }

    /// Run `f` on the inner ring buffer inside one critical section
    ///
    /// Keep `f` short: interrupts stay masked while it runs.
    pub fn with<R>(&self, f: impl FnOnce(&mut Queue<T, N>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Append an item; `false` if the queue is full (the item is lost)
    pub fn push(&self, item: T) -> bool {
        self.with(|queue| queue.push(item))
    }

    /// Remove the oldest item, if any
    pub fn pop(&self) -> Option<T> {
        self.with(|queue| queue.pop())
    }

    /// Copy the oldest item without removing it
    pub fn peek(&self) -> Option<T> {
        self.with(|queue| queue.peek())
    }

    /// Wait for an item and remove it
    ///
    /// Busy-waits until an interrupt handler pushes something. Foreground
    /// only: called from an interrupt handler this never returns.
    pub fn pull(&self) -> T {
        self.pull_with(&mut || core::hint::spin_loop())
    }

    /// Wait for an item and remove it, calling `idle` between attempts
    ///
    /// `idle` is where the loop can sleep until the next interrupt.
    pub fn pull_with<W: WaitForInterrupt + ?Sized>(&self, idle: &mut W) -> T {
        loop {
            if let Some(item) = self.pop() {
                return item;
            }
            idle.wait();
        }
    }

    /// Wait for an item and copy it without removing it
    pub fn peek_blocking_with<W: WaitForInterrupt + ?Sized>(&self, idle: &mut W) -> T {
        loop {
            if let Some(item) = self.peek() {
                return item;
            }
            idle.wait();
        }
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.with(|queue| queue.len())
    }

    /// Number of items that can still be pushed
    pub fn free(&self) -> usize {
        self.with(|queue| queue.free())
    }

    /// Check if there is nothing to pop
    pub fn is_empty(&self) -> bool {
        self.with(|queue| queue.is_empty())
    }

    /// Maximum number of queued items (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Drop all queued items
    pub fn clear(&self) {
        self.with(|queue| queue.clear())
    }

    /// Number of pushes refused because the queue was full
    pub fn overflows(&self) -> u16 {
        self.with(|queue| queue.overflows())
    }
}

impl<T: Copy, const N: usize> Default for SharedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> core::fmt::Debug for SharedQueue<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (len, overflows) = self.with(|queue| (queue.len(), queue.overflows()));
        f.debug_struct("SharedQueue")
            .field("len", &len)
            .field("capacity", &self.capacity())
            .field("overflows", &overflows)
            .finish()
    }
}
