//! Real-time timer
//!
//! A hardware timer in CTC mode interrupts once per millisecond; each
//! compare match advances a millisecond counter. Finer than the watchdog,
//! but the timer must keep running, so only idle sleep is possible.

use portable_atomic::{AtomicU32, Ordering};

use crate::event::{Event, EventType};
use crate::isr::InterruptHandler;
use crate::queue::SharedQueue;
use crate::time::Clock;

/// Told about every millisecond of real-time timer time
///
/// Called in interrupt context.
pub trait RttListener {
    fn on_rtt_change(&self, millis: u32);
}

/// Compare register value for a 1 ms period
///
/// `cpu_hz / prescaler / 1000 - 1`, e.g. 249 for 16 MHz with prescaler 64.
/// Returns `None` if the result does not fit an 8-bit timer.
pub const fn compare_value_8bit(cpu_hz: u32, prescaler: u16) -> Option<u8> {
    if prescaler == 0 {
        return None;
    }
    let ticks = cpu_hz / prescaler as u32 / 1000;
    if ticks == 0 || ticks > 256 {
        None
    } else {
        Some((ticks - 1) as u8)
    }
}

/// Millisecond counter advanced by a 1 kHz compare-match interrupt
pub struct RealTimeTimer<'l> {
    millis: AtomicU32,
    listener: Option<&'l dyn RttListener>,
}

impl<'l> RealTimeTimer<'l> {
    pub const fn new() -> Self {
        Self {
            millis: AtomicU32::new(0),
            listener: None,
        }
    }

    /// Timer notifying `listener` on every millisecond
    pub const fn with_listener(listener: &'l dyn RttListener) -> Self {
        Self {
            millis: AtomicU32::new(0),
            listener: Some(listener),
        }
    }

    /// Compare-match interrupt body
    pub fn on_tick(&self) {
        let millis = self.millis.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        if let Some(listener) = self.listener {
            listener.on_rtt_change(millis);
        }
    }

    pub fn set_millis(&self, millis: u32) {
        self.millis.store(millis, Ordering::Release);
    }

    pub fn reset(&self) {
        self.set_millis(0);
    }
}

impl Default for RealTimeTimer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RealTimeTimer<'_> {
    fn millis(&self) -> u32 {
        self.millis.load(Ordering::Acquire)
    }
}

impl InterruptHandler for RealTimeTimer<'_> {
    fn on_interrupt(&self) {
        self.on_tick();
    }
}

/// Pushes an `RTT_TIMER` event every `PERIOD_MS` of timer time
///
/// `PERIOD_MS` must be a power of two; anything else fails to compile.
pub struct RttEventCallback<'q, T: Copy, const N: usize, const PERIOD_MS: u32 = 1024> {
    queue: &'q SharedQueue<Event<T>, N>,
}

impl<'q, T: Copy + Default, const N: usize, const PERIOD_MS: u32>
    RttEventCallback<'q, T, N, PERIOD_MS>
{
    const PERIOD_CHECK: () = assert!(
        PERIOD_MS.is_power_of_two(),
        "RTT event period must be a power of 2"
    );

    pub const fn new(queue: &'q SharedQueue<Event<T>, N>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::PERIOD_CHECK;
        Self { queue }
    }

    /// Time between two events
    pub const fn period_ms(&self) -> u32 {
        PERIOD_MS
    }
}

impl<T: Copy + Default, const N: usize, const PERIOD_MS: u32> RttListener
    for RttEventCallback<'_, T, N, PERIOD_MS>
{
    fn on_rtt_change(&self, millis: u32) {
        if millis & (PERIOD_MS - 1) == 0 {
            self.queue.push(Event::signal(EventType::RTT_TIMER));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_value() {
        assert_eq!(compare_value_8bit(16_000_000, 64), Some(249));
        assert_eq!(compare_value_8bit(8_000_000, 64), Some(124));
        assert_eq!(compare_value_8bit(16_000_000, 8), None);
        assert_eq!(compare_value_8bit(16_000_000, 0), None);
    }

    #[test]
    fn test_counts_milliseconds() {
        let rtt = RealTimeTimer::new();
        for _ in 0..1500 {
            rtt.on_interrupt();
        }
        assert_eq!(rtt.millis(), 1500);
        rtt.reset();
        assert_eq!(rtt.millis(), 0);
    }

    #[test]
    fn test_event_every_period() {
        let queue: SharedQueue<Event, 8> = SharedQueue::new();
        let callback: RttEventCallback<(), 8, 256> = RttEventCallback::new(&queue);
        let rtt = RealTimeTimer::with_listener(&callback);

        for _ in 0..1000 {
            rtt.on_tick();
        }
        // 256, 512 and 768
        assert_eq!(queue.len(), 3);

        let default_period: RttEventCallback<(), 8> = RttEventCallback::new(&queue);
        assert_eq!(default_period.period_ms(), 1024);
    }

    #[test]
    fn test_listener_sees_wrapped_time() {
        let queue: SharedQueue<Event, 4> = SharedQueue::new();
        let callback: RttEventCallback<(), 4, 16> = RttEventCallback::new(&queue);
        let rtt = RealTimeTimer::with_listener(&callback);
        rtt.set_millis(u32::MAX);
        rtt.on_tick();
        assert_eq!(rtt.millis(), 0);
        assert_eq!(queue.pop().map(|e| e.kind()), Some(EventType::RTT_TIMER));
    }
}
