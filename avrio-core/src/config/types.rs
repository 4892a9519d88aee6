//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::event::EventType;
use crate::sources::WatchdogTimeout;

/// Longest tick accepted from a timer or RTT source
pub const MAX_TICK_MS: u32 = 32_768;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A tick period of 0 ms
    ZeroPeriod,
    /// RTT event periods must be powers of two
    PeriodNotPowerOfTwo(u32),
    /// Tick period above [`MAX_TICK_MS`]
    PeriodTooLong(u32),
}

/// Interrupt source whose events advance the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TickSource {
    /// Watchdog time-outs (`WDT_TIMER`)
    Watchdog(WatchdogTimeout),
    /// Real-time timer events every `period_ms` (`RTT_TIMER`)
    Rtt { period_ms: u32 },
    /// Timer compare matches divided down to `period_ms` (`TIMER_TICK`)
    Timer { period_ms: u32 },
}

impl TickSource {
    /// Event type pushed by this source
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Watchdog(_) => EventType::WDT_TIMER,
            Self::Rtt { .. } => EventType::RTT_TIMER,
            Self::Timer { .. } => EventType::TIMER_TICK,
        }
    }

    /// Milliseconds between two events
    pub const fn tick_ms(&self) -> u32 {
        match self {
            Self::Watchdog(timeout) => timeout.millis(),
            Self::Rtt { period_ms } | Self::Timer { period_ms } => *period_ms,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let period_ms = match *self {
            Self::Watchdog(_) => return Ok(()),
            Self::Rtt { period_ms } => {
                if period_ms != 0 && !period_ms.is_power_of_two() {
                    return Err(ConfigError::PeriodNotPowerOfTwo(period_ms));
                }
                period_ms
            }
            Self::Timer { period_ms } => period_ms,
        };
        if period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if period_ms > MAX_TICK_MS {
            return Err(ConfigError::PeriodTooLong(period_ms));
        }
        Ok(())
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::Watchdog(WatchdogTimeout::To64ms)
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerConfig {
    /// Clock driving the scheduler
    pub tick: TickSource,
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tick.validate()
    }
}
