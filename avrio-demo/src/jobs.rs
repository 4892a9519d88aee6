//! Scheduled demo jobs

use std::cell::{Cell, RefCell};

use log::trace;

use avrio_core::scheduler::{Job, JobTiming};
use avrio_hal::OutputPin;
use avrio_hal_host::SimPin;

use crate::config::JobConfig;

/// Toggles its own LED each time it runs
pub struct BlinkJob {
    name: String,
    timing: JobTiming,
    led: RefCell<SimPin>,
    runs: Cell<u32>,
}

impl BlinkJob {
    pub fn new(name: impl Into<String>, start_ms: u32, period_ms: u32) -> Self {
        Self {
            name: name.into(),
            timing: JobTiming::new(start_ms, period_ms),
            led: RefCell::new(SimPin::new()),
            runs: Cell::new(0),
        }
    }

    pub fn from_config(config: &JobConfig) -> Self {
        Self::new(config.name.as_str(), config.start_ms, config.period_ms)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Times the job ran
    pub fn runs(&self) -> u32 {
        self.runs.get()
    }

    /// LED level changes so far
    pub fn transitions(&self) -> u32 {
        self.led.borrow().transitions()
    }

    pub fn is_led_on(&self) -> bool {
        self.led.borrow().is_set_high()
    }
}

impl Job for BlinkJob {
    fn timing(&self) -> &JobTiming {
        &self.timing
    }

    fn on_schedule(&self, millis: u32) {
        self.led.borrow_mut().toggle();
        self.runs.set(self.runs.get() + 1);
        trace!(
            "job {} ran at {} ms, next at {} ms",
            self.name,
            millis,
            self.timing.next_time()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_led() {
        let job = BlinkJob::new("led", 0, 1000);
        job.on_schedule(0);
        assert!(job.is_led_on());
        job.on_schedule(1000);
        assert!(!job.is_led_on());
        assert_eq!(job.runs(), 2);
        assert_eq!(job.transitions(), 2);
    }
}
