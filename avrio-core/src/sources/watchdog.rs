//! Watchdog timer as a coarse clock
//!
//! In interrupt mode the watchdog fires every 16 ms to 8 s and keeps running
//! in the deepest sleep mode, which makes it the cheapest way to wake up
//! periodically. Every time-out adds the period to a millisecond counter and
//! optionally pushes a [`WDT_TIMER`](EventType::WDT_TIMER) event.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventType};
use crate::isr::InterruptHandler;
use crate::queue::SharedQueue;
use crate::time::Clock;

/// Watchdog time-out period
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum WatchdogTimeout {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "16ms"))]
    To16ms = 0,
    #[cfg_attr(feature = "serde", serde(rename = "32ms"))]
    To32ms = 1,
    #[cfg_attr(feature = "serde", serde(rename = "64ms"))]
    To64ms = 2,
    #[cfg_attr(feature = "serde", serde(rename = "125ms"))]
    To125ms = 3,
    #[cfg_attr(feature = "serde", serde(rename = "250ms"))]
    To250ms = 4,
    #[cfg_attr(feature = "serde", serde(rename = "500ms"))]
    To500ms = 5,
    #[cfg_attr(feature = "serde", serde(rename = "1s"))]
    To1s = 6,
    #[cfg_attr(feature = "serde", serde(rename = "2s"))]
    To2s = 7,
    #[cfg_attr(feature = "serde", serde(rename = "4s"))]
    To4s = 8,
    #[cfg_attr(feature = "serde", serde(rename = "8s"))]
    To8s = 9,
}

impl WatchdogTimeout {
    /// WDTCSR: watchdog interrupt enable
    pub const WDIE: u8 = 1 << 6;
    /// WDTCSR: prescaler bit 3 (not contiguous with bits 0..=2)
    pub const WDP3: u8 = 1 << 5;

    /// Milliseconds per time-out, as counted by the clock
    ///
    /// Nominal periods are powers of two of 16 ms; the hardware's 125 ms is
    /// counted as 128.
    pub const fn millis(self) -> u32 {
        16 << (self as u32)
    }

    /// WDTCSR value selecting this period in interrupt mode
    pub const fn control_bits(self) -> u8 {
        let prescaler = self as u8;
        let wdp3 = if prescaler & 0x08 != 0 { Self::WDP3 } else { 0 };
        Self::WDIE | (prescaler & 0x07) | wdp3
    }

    /// Look up a period by prescaler value (0..=9)
    pub const fn from_prescaler(prescaler: u8) -> Option<Self> {
        match prescaler {
            0 => Some(Self::To16ms),
            1 => Some(Self::To32ms),
            2 => Some(Self::To64ms),
            3 => Some(Self::To125ms),
            4 => Some(Self::To250ms),
            5 => Some(Self::To500ms),
            6 => Some(Self::To1s),
            7 => Some(Self::To2s),
            8 => Some(Self::To4s),
            9 => Some(Self::To8s),
            _ => None,
        }
    }
}

/// Millisecond clock advanced by watchdog time-outs
///
/// Without a queue it only counts time; with one it also pushes a
/// `WDT_TIMER` event per time-out, which is what drives a
/// [`Scheduler`](crate::Scheduler) configured with the same period.
pub struct WatchdogClock<'q, T: Copy, const N: usize> {
    queue: Option<&'q SharedQueue<Event<T>, N>>,
    millis: AtomicU32,
    ms_per_tick: AtomicU32,
    running: AtomicBool,
}

impl<'q, T: Copy + Default, const N: usize> WatchdogClock<'q, T, N> {
    /// Clock that only counts time
    pub const fn new() -> Self {
        Self {
            queue: None,
            millis: AtomicU32::new(0),
            ms_per_tick: AtomicU32::new(WatchdogTimeout::To16ms.millis()),
            running: AtomicBool::new(false),
        }
    }

    /// Clock that also pushes a `WDT_TIMER` event per time-out
    pub const fn with_events(queue: &'q SharedQueue<Event<T>, N>) -> Self {
        Self {
            queue: Some(queue),
            millis: AtomicU32::new(0),
            ms_per_tick: AtomicU32::new(WatchdogTimeout::To16ms.millis()),
            running: AtomicBool::new(false),
        }
    }

    /// Start counting with the given period
    ///
    /// Returns the WDTCSR value the port writes (inside the timed change
    /// sequence) to start the watchdog in interrupt mode.
    pub fn begin(&self, timeout: WatchdogTimeout) -> u8 {
        self.ms_per_tick.store(timeout.millis(), Ordering::Relaxed);
        self.running.store(true, Ordering::Release);
        timeout.control_bits()
    }

    /// Stop counting; time-outs are ignored until the next `begin`
    pub fn end(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Milliseconds added per time-out
    pub fn ms_per_tick(&self) -> u32 {
        self.ms_per_tick.load(Ordering::Relaxed)
    }

    /// Time-out interrupt body
    pub fn on_tick(&self) {
        if !self.is_running() {
            return;
        }
        self.millis
            .fetch_add(self.ms_per_tick.load(Ordering::Relaxed), Ordering::AcqRel);
        if let Some(queue) = self.queue {
            queue.push(Event::signal(EventType::WDT_TIMER));
        }
    }

    /// Overwrite the millisecond count
    pub fn set_millis(&self, millis: u32) {
        self.millis.store(millis, Ordering::Release);
    }

    /// Back to zero
    pub fn reset(&self) {
        self.set_millis(0);
    }
}

impl<T: Copy + Default, const N: usize> Default for WatchdogClock<'_, T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> Clock for WatchdogClock<'_, T, N> {
    fn millis(&self) -> u32 {
        self.millis.load(Ordering::Acquire)
    }
}

impl<T: Copy + Default, const N: usize> InterruptHandler for WatchdogClock<'_, T, N> {
    fn on_interrupt(&self) {
        self.on_tick();
    }
}
