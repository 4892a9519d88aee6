//! Foreground event loop
//!
//! Takes events off the shared queue one at a time and hands each to the
//! dispatcher. This is the only place where the foreground blocks.

use avrio_hal::WaitForInterrupt;

use crate::event::{Dispatcher, Event};
use crate::queue::SharedQueue;

/// Counters kept by the [`EventLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopStats {
    /// Events taken off the queue
    pub events: u32,
    /// Events no handler wanted
    pub unhandled: u32,
}

/// Pulls events from a queue and dispatches them
pub struct EventLoop<'a, 'h, T: Copy, const N: usize, const H: usize> {
    queue: &'a SharedQueue<Event<T>, N>,
    dispatcher: &'a Dispatcher<'h, T, H>,
    stats: LoopStats,
}

impl<'a, 'h, T: Copy, const N: usize, const H: usize> EventLoop<'a, 'h, T, N, H> {
    pub const fn new(
        queue: &'a SharedQueue<Event<T>, N>,
        dispatcher: &'a Dispatcher<'h, T, H>,
    ) -> Self {
        Self {
            queue,
            dispatcher,
            stats: LoopStats {
                events: 0,
                unhandled: 0,
            },
        }
    }

    /// Dispatch one queued event, if any
    ///
    /// Returns the event, or `None` if the queue was empty.
    pub fn run_once(&mut self) -> Option<Event<T>> {
        let event = self.queue.pop()?;
        self.deliver(&event);
        Some(event)
    }

    /// Dispatch queued events until the queue is empty
    ///
    /// Events pushed by interrupts meanwhile are processed too. Returns the
    /// number of events dispatched.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.run_once().is_some() {
            count += 1;
        }
        count
    }

    /// Wait for the next event and dispatch it
    pub fn next<W: WaitForInterrupt + ?Sized>(&mut self, idle: &mut W) -> Event<T> {
        let event = self.queue.pull_with(idle);
        self.deliver(&event);
        event
    }

    /// Dispatch events forever
    pub fn run<W: WaitForInterrupt + ?Sized>(&mut self, idle: &mut W) -> ! {
        loop {
            self.next(idle);
        }
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = LoopStats::default();
    }

    fn deliver(&mut self, event: &Event<T>) {
        self.stats.events = self.stats.events.wrapping_add(1);
        if self.dispatcher.dispatch(event) == 0 {
            self.stats.unhandled = self.stats.unhandled.wrapping_add(1);
        }
    }
}
