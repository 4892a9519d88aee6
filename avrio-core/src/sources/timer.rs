//! Periodic tick events from a hardware timer

use portable_atomic::{AtomicU16, Ordering};

use crate::event::{Event, EventType};
use crate::isr::InterruptHandler;
use crate::queue::SharedQueue;

/// Pushes a `TIMER_TICK` event every `divider` compare matches
pub struct TimerTicks<'q, T: Copy, const N: usize> {
    queue: &'q SharedQueue<Event<T>, N>,
    divider: u16,
    count: AtomicU16,
}

impl<'q, T: Copy + Default, const N: usize> TimerTicks<'q, T, N> {
    /// A divider of 0 is treated as 1
    pub const fn new(queue: &'q SharedQueue<Event<T>, N>, divider: u16) -> Self {
        Self {
            queue,
            divider: if divider == 0 { 1 } else { divider },
            count: AtomicU16::new(0),
        }
    }

    pub fn divider(&self) -> u16 {
        self.divider
    }

    /// Compare-match interrupt body
    pub fn on_match(&self) {
        let count = self.count.load(Ordering::Relaxed) + 1;
        if count >= self.divider {
            self.count.store(0, Ordering::Relaxed);
            self.queue.push(Event::signal(EventType::TIMER_TICK));
        } else {
            self.count.store(count, Ordering::Relaxed);
        }
    }

    /// Restart counting towards the next tick
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

impl<T: Copy + Default, const N: usize> InterruptHandler for TimerTicks<'_, T, N> {
    fn on_interrupt(&self) {
        self.on_match();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divider() {
        let queue: SharedQueue<Event, 16> = SharedQueue::new();
        let ticks = TimerTicks::new(&queue, 10);
        for _ in 0..35 {
            ticks.on_interrupt();
        }
        assert_eq!(queue.len(), 3);
        assert!(queue.pop().is_some_and(|e| e.is(EventType::TIMER_TICK)));
    }

    #[test]
    fn test_zero_divider_ticks_every_match() {
        let queue: SharedQueue<Event, 8> = SharedQueue::new();
        let ticks = TimerTicks::new(&queue, 0);
        assert_eq!(ticks.divider(), 1);
        ticks.on_match();
        ticks.on_match();
        assert_eq!(queue.len(), 2);
    }
}
