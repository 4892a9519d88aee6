//! Job scheduler driven by clock tick events
//!
//! The scheduler keeps its own millisecond time. Every tick event adds the
//! configured tick duration and runs the jobs whose `next_time` has been
//! reached, in registration order.

use core::cell::{Cell, RefCell};

use heapless::Vec;

use super::job::Job;
use crate::config::SchedulerConfig;
use crate::event::{Event, EventHandler, EventType};
use crate::same_object;
use crate::time::Clock;

/// Errors when scheduling a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// All job slots are taken
    Full,
    /// This job is already scheduled
    AlreadyScheduled,
}

/// Scheduler for up to `J` jobs
///
/// Register it with a [`Dispatcher`](crate::Dispatcher) for its tick event
/// type. All methods take `&self`, so jobs may schedule and unschedule jobs
/// (themselves included) from their hooks.
pub struct Scheduler<'j, const J: usize> {
    /// Tick event this scheduler reacts to
    kind: EventType,
    /// Time added per tick event
    tick_ms: u32,
    /// Scheduler time in ms
    now: Cell<u32>,
    /// Scheduled jobs, in registration order
    jobs: RefCell<Vec<&'j dyn Job, J>>,
}

impl<'j, const J: usize> Scheduler<'j, J> {
    /// Create a scheduler advancing `tick_ms` on every `kind` event
    pub const fn new(kind: EventType, tick_ms: u32) -> Self {
        Self {
            kind,
            tick_ms,
            now: Cell::new(0),
            jobs: RefCell::new(Vec::new()),
        }
    }

    /// Create a scheduler for a configured tick source
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.tick.event_type(), config.tick.tick_ms())
    }

    /// Tick event type
    pub fn kind(&self) -> EventType {
        self.kind
    }

    /// Time added per tick
    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Advance by one tick and run due jobs
    pub fn tick(&self) -> usize {
        self.advance(self.tick_ms)
    }

    /// Advance by `elapsed_ms` and run due jobs
    ///
    /// Returns the number of jobs that fired.
    pub fn advance(&self, elapsed_ms: u32) -> usize {
        let now = self.now.get().wrapping_add(elapsed_ms);
        self.now.set(now);
        self.run_due(now)
    }

    /// Run every job due at `now`
    ///
    /// Each job fires at most once per call. Periodic jobs then move past
    /// `now` by whole periods unless their hook rescheduled them; one-shot
    /// jobs are removed.
    pub fn run_due(&self, now: u32) -> usize {
        let mut fired = 0;
        let mut index = 0;
        loop {
            // No borrow may be held while a hook runs
            let job = match self.jobs.borrow().get(index).copied() {
                Some(job) => job,
                None => break,
            };
            let timing = job.timing();
            if !timing.is_due(now) {
                index += 1;
                continue;
            }

            timing.take_rescheduled();
            job.on_schedule(now);
            fired += 1;

            let rescheduled = timing.take_rescheduled();
            let keep = rescheduled || timing.is_periodic();
            if !rescheduled {
                timing.advance_past(now);
            }

            // The hook may have changed the list; find the job again
            let mut jobs = self.jobs.borrow_mut();
            let position = if jobs.get(index).is_some_and(|j| same_object(*j, job)) {
                Some(index)
            } else {
                jobs.iter().position(|j| same_object(*j, job))
            };
            match position {
                Some(pos) if keep => index = pos + 1,
                Some(pos) => {
                    jobs.remove(pos);
                    index = pos;
                }
                // Unscheduled by its own hook
                None => {}
            }
        }
        fired
    }

    /// Add a job after all scheduled ones
    pub fn schedule(&self, job: &'j dyn Job) -> Result<(), ScheduleError> {
        let mut jobs = self.jobs.borrow_mut();
        if jobs.iter().any(|j| same_object(*j, job)) {
            return Err(ScheduleError::AlreadyScheduled);
        }
        jobs.push(job).map_err(|_| ScheduleError::Full)
    }

    /// Remove a job; returns `false` if it was not scheduled
    pub fn unschedule(&self, job: &dyn Job) -> bool {
        let mut jobs = self.jobs.borrow_mut();
        match jobs.iter().position(|j| same_object(*j, job)) {
            Some(index) => {
                jobs.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, job: &dyn Job) -> bool {
        self.jobs.borrow().iter().any(|j| same_object(*j, job))
    }

    /// Number of scheduled jobs
    pub fn len(&self) -> usize {
        self.jobs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.borrow().is_empty()
    }

    /// Current scheduler time in ms
    pub fn millis(&self) -> u32 {
        self.now.get()
    }

    /// Set the scheduler time without running jobs
    pub fn set_millis(&self, millis: u32) {
        self.now.set(millis);
    }

    /// Back to time 0 with no jobs
    pub fn reset(&self) {
        self.now.set(0);
        self.jobs.borrow_mut().clear();
    }
}

impl<T: Copy, const J: usize> EventHandler<T> for Scheduler<'_, J> {
    fn event_type(&self) -> EventType {
        self.kind
    }

    fn on_event(&self, _event: &Event<T>) {
        self.tick();
    }
}

impl<const J: usize> Clock for Scheduler<'_, J> {
    fn millis(&self) -> u32 {
        self.now.get()
    }
}

impl<const J: usize> core::fmt::Debug for Scheduler<'_, J> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("kind", &self.kind)
            .field("tick_ms", &self.tick_ms)
            .field("now", &self.now.get())
            .field("jobs", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Dispatcher;
    use crate::scheduler::{FnJob, JobTiming};
    use proptest::prelude::*;

    /// Job counting its runs and remembering the last time it saw
    struct Counter {
        timing: JobTiming,
        runs: Cell<u32>,
        last: Cell<u32>,
    }

    impl Counter {
        fn new(next_time: u32, period: u32) -> Self {
            Self {
                timing: JobTiming::new(next_time, period),
                runs: Cell::new(0),
                last: Cell::new(0),
            }
        }
    }

    impl Job for Counter {
        fn timing(&self) -> &JobTiming {
            &self.timing
        }

        fn on_schedule(&self, millis: u32) {
            self.runs.set(self.runs.get() + 1);
            self.last.set(millis);
        }
    }

    #[test]
    fn test_periodic_next_time() {
        let job = Counter::new(0, 1000);
        let scheduler: Scheduler<4> = Scheduler::new(EventType::WDT_TIMER, 64);
        scheduler.schedule(&job).unwrap();

        scheduler.tick();
        assert_eq!(job.runs.get(), 1);
        assert_eq!(job.last.get(), 64);
        assert_eq!(job.timing.next_time(), 1000);

        // 15 more ticks reach 1024
        for _ in 0..14 {
            scheduler.tick();
        }
        assert_eq!(scheduler.millis(), 960);
        assert_eq!(job.runs.get(), 1);
        scheduler.tick();
        assert_eq!(job.runs.get(), 2);
        assert_eq!(job.timing.next_time(), 2000);
    }

    #[test]
    fn test_two_jobs_by_ticks() {
        let a = Counter::new(500, 500);
        let b = Counter::new(750, 750);
        let scheduler: Scheduler<4> = Scheduler::new(EventType::TIMER_TICK, 250);
        scheduler.schedule(&a).unwrap();
        scheduler.schedule(&b).unwrap();

        for _ in 0..6 {
            scheduler.tick();
        }
        assert_eq!(scheduler.millis(), 1500);
        assert_eq!(a.runs.get(), 3);
        assert_eq!(b.runs.get(), 2);
    }

    #[test]
    fn test_tick_events_from_dispatcher() {
        let job = Counter::new(128, 128);
        let scheduler: Scheduler<2> = Scheduler::new(EventType::WDT_TIMER, 64);
        scheduler.schedule(&job).unwrap();

        let mut dispatcher: Dispatcher<(), 2> = Dispatcher::new();
        dispatcher.insert(&scheduler).unwrap();
        for _ in 0..4 {
            dispatcher.dispatch(&Event::signal(EventType::WDT_TIMER));
            dispatcher.dispatch(&Event::signal(EventType::RTT_TIMER));
        }
        assert_eq!(scheduler.millis(), 256);
        assert_eq!(job.runs.get(), 2);
    }

    #[test]
    fn test_coarse_tick_fires_once() {
        let job = Counter::new(100, 100);
        let scheduler: Scheduler<2> = Scheduler::new(EventType::WDT_TIMER, 1000);
        scheduler.schedule(&job).unwrap();

        scheduler.tick();
        assert_eq!(job.runs.get(), 1);
        assert_eq!(job.timing.next_time(), 1100);
        scheduler.tick();
        assert_eq!(job.runs.get(), 2);
        assert_eq!(job.timing.next_time(), 2100);
    }

    #[test]
    fn test_one_shot_removed() {
        let job = Counter::new(200, 0);
        let scheduler: Scheduler<2> = Scheduler::new(EventType::WDT_TIMER, 100);
        scheduler.schedule(&job).unwrap();

        scheduler.tick();
        assert!(scheduler.is_scheduled(&job));
        scheduler.tick();
        assert_eq!(job.runs.get(), 1);
        assert!(!scheduler.is_scheduled(&job));
        scheduler.advance(10_000);
        assert_eq!(job.runs.get(), 1);
    }

    #[test]
    fn test_ties_fire_in_registration_order() {
        let order = RefCell::new(std::vec::Vec::new());
        let first = FnJob::new(100, 100, |_| order.borrow_mut().push(1));
        let second = FnJob::new(100, 100, |_| order.borrow_mut().push(2));
        let scheduler: Scheduler<2> = Scheduler::new(EventType::RTT_TIMER, 100);
        scheduler.schedule(&second).unwrap();
        scheduler.schedule(&first).unwrap();

        scheduler.tick();
        assert_eq!(*order.borrow(), [2, 1]);
    }

    #[test]
    fn test_schedule_errors() {
        let a = Counter::new(0, 10);
        let b = Counter::new(0, 10);
        let scheduler: Scheduler<1> = Scheduler::new(EventType::WDT_TIMER, 16);
        assert_eq!(scheduler.schedule(&a), Ok(()));
        assert_eq!(scheduler.schedule(&a), Err(ScheduleError::AlreadyScheduled));
        assert_eq!(scheduler.schedule(&b), Err(ScheduleError::Full));
        assert!(scheduler.unschedule(&a));
        assert!(!scheduler.unschedule(&a));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_hook_reschedule_wins() {
        /// Backs off by a second instead of its period
        struct Backoff<'a>(&'a Counter);

        impl Job for Backoff<'_> {
            fn timing(&self) -> &JobTiming {
                self.0.timing()
            }

            fn on_schedule(&self, millis: u32) {
                self.0.on_schedule(millis);
                self.0.timing().reschedule(millis + 1000);
            }
        }

        let counter = Counter::new(200, 100);
        let backoff = Backoff(&counter);
        let scheduler: Scheduler<1> = Scheduler::new(EventType::WDT_TIMER, 100);
        scheduler.schedule(&backoff).unwrap();

        scheduler.advance(200);
        assert_eq!(counter.timing.next_time(), 1200);
        for _ in 0..9 {
            scheduler.tick();
        }
        assert_eq!(counter.runs.get(), 1);
        scheduler.tick();
        assert_eq!(counter.runs.get(), 2);
        assert_eq!(counter.timing.next_time(), 2200);
    }

    #[test]
    fn test_hooks_change_job_list() {
        // Leaked so jobs and scheduler can refer to each other
        let scheduler: &'static Scheduler<'static, 4> =
            Box::leak(Box::new(Scheduler::new(EventType::WDT_TIMER, 100)));
        let late: &'static Counter = Box::leak(Box::new(Counter::new(0, 100)));
        let survivor: &'static Counter = Box::leak(Box::new(Counter::new(100, 100)));
        let first_run: &'static Cell<bool> = Box::leak(Box::new(Cell::new(true)));

        let spawner: &'static dyn Job = Box::leak(Box::new(FnJob::new(100, 100, move |_| {
            if first_run.replace(false) {
                let _ = scheduler.schedule(late);
            }
        })));
        scheduler.schedule(spawner).unwrap();
        scheduler.schedule(survivor).unwrap();

        // `late` is added behind the cursor, is due and runs in the same pass
        scheduler.tick();
        assert_eq!(survivor.runs.get(), 1);
        assert_eq!(late.runs.get(), 1);
        assert_eq!(scheduler.len(), 3);

        // Removing a job ahead of the caller
        let quitter: &'static dyn Job = Box::leak(Box::new(FnJob::new(200, 100, move |_| {
            scheduler.unschedule(late);
        })));
        scheduler.schedule(quitter).unwrap();
        scheduler.tick();
        assert_eq!(late.runs.get(), 2);
        assert!(!scheduler.is_scheduled(late));
        assert!(scheduler.is_scheduled(quitter));
        assert_eq!(scheduler.len(), 3);

        // A job unscheduling itself does not make the next one skip a beat
        let slot: &'static Cell<Option<&'static dyn Job>> = Box::leak(Box::new(Cell::new(None)));
        let selfish: &'static dyn Job = Box::leak(Box::new(FnJob::new(300, 100, move |_| {
            if let Some(me) = slot.get() {
                scheduler.unschedule(me);
            }
        })));
        slot.set(Some(selfish));
        assert!(scheduler.unschedule(survivor));
        scheduler.schedule(selfish).unwrap();
        scheduler.schedule(survivor).unwrap();
        assert_eq!(scheduler.schedule(late), Err(ScheduleError::Full));

        scheduler.tick();
        assert!(!scheduler.is_scheduled(selfish));
        assert_eq!(survivor.runs.get(), 3);
        assert_eq!(survivor.timing.next_time(), 400);

        scheduler.reset();
        assert_eq!(scheduler.millis(), 0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_reschedule_to_same_time() {
        /// Retries at the time it was planned for, then stops retrying
        struct Retry {
            counter: Counter,
        }

        impl Job for Retry {
            fn timing(&self) -> &JobTiming {
                &self.counter.timing
            }

            fn on_schedule(&self, millis: u32) {
                self.counter.on_schedule(millis);
                if self.counter.runs.get() < 3 {
                    let planned = self.counter.timing.next_time();
                    self.counter.timing.reschedule(planned);
                }
            }
        }

        let retry = Retry {
            counter: Counter::new(100, 0),
        };
        let scheduler: Scheduler<1> = Scheduler::new(EventType::WDT_TIMER, 100);
        scheduler.schedule(&retry).unwrap();

        scheduler.tick();
        assert_eq!(retry.counter.runs.get(), 1);
        assert!(scheduler.is_scheduled(&retry));
        assert_eq!(retry.counter.timing.next_time(), 100);

        scheduler.tick();
        scheduler.tick();
        assert_eq!(retry.counter.runs.get(), 3);
        assert!(!scheduler.is_scheduled(&retry));
    }

    #[test]
    fn test_jobs_survive_time_wrap() {
        let job = Counter::new(u32::MAX - 50, 100);
        let scheduler: Scheduler<1> = Scheduler::new(EventType::WDT_TIMER, 64);
        scheduler.schedule(&job).unwrap();
        scheduler.set_millis(u32::MAX - 100);

        for _ in 0..1000 {
            scheduler.tick();
        }
        // 64000 ms elapsed from MAX - 100: time wrapped to 63899
        assert_eq!(scheduler.millis(), 63_899);
        // One run per tick that reached a beat, beats every 100 ms
        assert!(job.runs.get() >= 600);
        let next = job.timing.next_time();
        assert!(next > 63_899 && next <= 63_899 + 100);
        assert_eq!(next.wrapping_sub(u32::MAX - 50) % 100, 0);
    }

    #[test]
    fn test_set_millis_does_not_run() {
        let job = Counter::new(50, 50);
        let scheduler: Scheduler<1> = Scheduler::new(EventType::WDT_TIMER, 16);
        scheduler.schedule(&job).unwrap();
        scheduler.set_millis(1000);
        assert_eq!(job.runs.get(), 0);
        assert_eq!(Clock::millis(&scheduler), 1000);
        scheduler.tick();
        assert_eq!(job.runs.get(), 1);
        assert_eq!(job.timing.next_time(), 1050);
    }

    proptest! {
        #[test]
        fn prop_phase_preserved(
            start in 0u32..5_000,
            period in 1u32..2_000,
            steps in proptest::collection::vec(1u32..5_000, 1..40),
        ) {
            let job = Counter::new(start, period);
            let scheduler: Scheduler<1> = Scheduler::new(EventType::TIMER_TICK, 1);
            scheduler.schedule(&job).unwrap();

            for step in steps {
                let before = job.runs.get();
                scheduler.advance(step);
                let now = scheduler.millis();
                prop_assert!(job.runs.get() - before <= 1);
                prop_assert!(job.timing.next_time() > now);
                prop_assert_eq!((job.timing.next_time() - start) % period, 0);
            }
        }
    }
}
