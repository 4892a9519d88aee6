//! Schedulable jobs
//!
//! Timing lives in [`JobTiming`] cells so that a job, its hook and the
//! scheduler can all adjust it through shared references.

use core::cell::Cell;

/// When a job runs next, and how often
///
/// Times are scheduler milliseconds. A period of 0 makes the job one-shot:
/// the scheduler drops it after it fires once.
///
/// Times wrap with the scheduler clock and are compared by signed
/// difference, so a job planned more than 2^31 ms (about 24 days) ahead
/// counts as overdue.
#[derive(Debug, Default)]
pub struct JobTiming {
    next_time: Cell<u32>,
    period: Cell<u32>,
    /// Set by [`reschedule`](JobTiming::reschedule), cleared by the scheduler
    rescheduled: Cell<bool>,
}

impl JobTiming {
    /// First run at `next_time`, then every `period` ms (0 = once)
    pub const fn new(next_time: u32, period: u32) -> Self {
        Self {
            next_time: Cell::new(next_time),
            period: Cell::new(period),
            rescheduled: Cell::new(false),
        }
    }

    /// Single run at `when`
    pub const fn once(when: u32) -> Self {
        Self::new(when, 0)
    }

    /// Scheduler time of the next run
    pub fn next_time(&self) -> u32 {
        self.next_time.get()
    }

    /// Interval between runs, 0 for one-shot jobs
    pub fn period(&self) -> u32 {
        self.period.get()
    }

    pub fn is_periodic(&self) -> bool {
        self.period.get() != 0
    }

    /// Move the next run to `when`
    ///
    /// Called from the job's own hook, this replaces the period step for
    /// this run, even if `when` is the time just planned.
    pub fn reschedule(&self, when: u32) {
        self.next_time.set(when);
        self.rescheduled.set(true);
    }

    /// Change the interval; takes effect after the next run
    pub fn set_period(&self, period: u32) {
        self.period.set(period);
    }

    /// How far `now` is past `next_time`, negative if not reached yet
    fn lag(next_time: u32, now: u32) -> i32 {
        now.wrapping_sub(next_time) as i32
    }

    pub(crate) fn is_due(&self, now: u32) -> bool {
        Self::lag(self.next_time.get(), now) >= 0
    }

    /// Clear the reschedule mark; returns whether it was set
    pub(crate) fn take_rescheduled(&self) -> bool {
        self.rescheduled.replace(false)
    }

    /// Step a periodic job past `now`, at most once per tick
    ///
    /// Missed beats are skipped whole so `next_time` stays on the original
    /// phase.
    pub(crate) fn advance_past(&self, now: u32) {
        let period = self.period.get();
        if period == 0 {
            return;
        }
        let mut next = self.next_time.get().wrapping_add(period);
        let behind = Self::lag(next, now);
        if behind >= 0 {
            let skipped = behind as u32 / period + 1;
            next = next.wrapping_add(skipped.wrapping_mul(period));
        }
        self.next_time.set(next);
    }
}

/// Work run by the [`Scheduler`](super::Scheduler)
pub trait Job {
    /// The job's timing cells
    fn timing(&self) -> &JobTiming;

    /// Called in the foreground once the job is due
    ///
    /// `millis` is the scheduler time of the tick that found it due. The
    /// hook may reschedule this job, or schedule and unschedule others.
    fn on_schedule(&self, millis: u32);
}

/// Job built from a closure
pub struct FnJob<F> {
    timing: JobTiming,
    callback: F,
}

impl<F: Fn(u32)> FnJob<F> {
    /// Run `callback` at `next_time`, then every `period` ms (0 = once)
    pub const fn new(next_time: u32, period: u32, callback: F) -> Self {
        Self {
            timing: JobTiming::new(next_time, period),
            callback,
        }
    }
}

impl<F: Fn(u32)> Job for FnJob<F> {
    fn timing(&self) -> &JobTiming {
        &self.timing
    }

    fn on_schedule(&self, millis: u32) {
        (self.callback)(millis)
    }
}
