//! The simulated board
//!
//! Wires configured jobs, handlers and interrupt sources together the way
//! firmware would, then steps simulated time one millisecond at a time:
//! hardware raises interrupts first, then the foreground loop drains the
//! event queue.

use log::{debug, info, warn};

use avrio_core::bind_vectors;
use avrio_core::config::TickSource;
use avrio_core::event::Dispatcher;
use avrio_core::event_loop::{EventLoop, LoopStats};
use avrio_core::sources::rtt::compare_value_8bit;
use avrio_core::sources::{
    ExternalInterruptEvents, PinChangeEvents, RealTimeTimer, RttEventCallback, RttListener,
    TimerTicks, WatchdogClock,
};
use avrio_core::{Clock, Scheduler, Vector};
use avrio_hal::InterruptControl;
use avrio_hal_host::{SimInterrupts, SimPort};

use crate::config::{DemoConfig, PressConfig};
use crate::error::DemoError;
use crate::handlers::{ButtonHandler, ExternalCounter};
use crate::jobs::BlinkJob;
use crate::mcu::SimMcu;
use crate::{DemoQueue, MAX_HANDLERS, MAX_JOBS, QUEUE_SIZE};

/// Simulated CPU clock
pub const F_CPU: u32 = 16_000_000;

/// Timer0 prescaler for the 1 ms real-time timer
const RTT_PRESCALER: u16 = 64;

/// INT0 is on PD2
const INT0_PIN: u8 = 2;

/// What one job did during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub name: String,
    pub runs: u32,
    pub led_transitions: u32,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Simulated time
    pub elapsed_ms: u32,
    /// Time according to the configured tick source's clock
    pub clock_ms: u32,
    /// Time according to the scheduler
    pub scheduler_ms: u32,
    pub loop_stats: LoopStats,
    /// Events lost to a full queue
    pub overflows: u16,
    /// Interrupts with no handler bound
    pub spurious: u32,
    pub jobs: Vec<JobReport>,
    pub button_presses: u32,
    pub external_events: u32,
}

/// RTT event callback for a period only known at run time
fn rtt_callback(queue: &DemoQueue, period_ms: u32) -> Option<Box<dyn RttListener + '_>> {
    macro_rules! by_period {
        ($($period:literal),+) => {
            match period_ms {
                $($period => Some(Box::new(
                    RttEventCallback::<u8, QUEUE_SIZE, $period>::new(queue),
                ) as Box<dyn RttListener + '_>),)+
                _ => None,
            }
        };
    }
    by_period!(1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768)
}

/// Pin level changes of the scripted button presses, in time order
fn press_edges(presses: &[PressConfig]) -> Vec<(u32, u8, bool)> {
    let mut edges: Vec<(u32, u8, bool)> = presses
        .iter()
        .flat_map(|press| {
            [
                (press.at_ms, press.pin, false),
                (press.at_ms.saturating_add(press.hold_ms), press.pin, true),
            ]
        })
        .collect();
    edges.sort_by_key(|&(at, _, _)| at);
    edges
}

/// Run the configured board for `config.duration_ms` of simulated time
///
/// `queue` is the event queue shared by interrupt handlers and the
/// foreground loop; it is cleared first.
pub fn run_simulation(config: &DemoConfig, queue: &DemoQueue) -> Result<Report, DemoError> {
    config.validate()?;
    queue.clear();
    let tick = config.scheduler.tick;

    // Foreground side
    let jobs: Vec<BlinkJob> = config.jobs.iter().map(BlinkJob::from_config).collect();
    let buttons = ButtonHandler::new(config.buttons.pins);
    let external = ExternalCounter::default();

    let scheduler: Scheduler<MAX_JOBS> = Scheduler::from_config(&config.scheduler);
    for job in &jobs {
        scheduler.schedule(job)?;
    }

    let mut dispatcher: Dispatcher<u8, MAX_HANDLERS> = Dispatcher::new();
    dispatcher.insert(&scheduler)?;
    dispatcher.insert(&buttons)?;
    dispatcher.insert(&external)?;

    // Interrupt side
    let port = SimPort::new(0xFF);
    let watchdog = WatchdogClock::with_events(queue);
    let rtt_events = match tick {
        TickSource::Rtt { period_ms } => Some(rtt_callback(queue, period_ms).ok_or_else(|| {
            DemoError::Invalid(format!("no RTT callback for a {period_ms} ms period"))
        })?),
        _ => None,
    };
    let rtt = match &rtt_events {
        Some(callback) => RealTimeTimer::with_listener(callback.as_ref()),
        None => RealTimeTimer::new(),
    };
    let divider = match tick {
        TickSource::Timer { period_ms } => period_ms as u16,
        _ => 1,
    };
    let timer = TimerTicks::new(queue, divider);
    let pin_changes = PinChangeEvents::new(&port, queue);
    let int0 = ExternalInterruptEvents::new(&port, INT0_PIN, config.external.trigger, queue);

    // Interrupts stay disabled until everything is bound, as after reset
    let irq = SimInterrupts::new();
    let mut mcu = SimMcu::new(&irq);
    bind_vectors!(mcu.vectors(), { PcInt2 => &pin_changes, Int0 => &int0 })?;
    let (tick_vector, clock): (Vector, &dyn Clock) = match tick {
        TickSource::Watchdog(timeout) => {
            mcu.vectors().bind(Vector::Wdt, &watchdog)?;
            let control = watchdog.begin(timeout);
            info!(
                "watchdog clock: {} ms per tick, WDTCSR={:#010b}",
                timeout.millis(),
                control
            );
            (Vector::Wdt, &watchdog)
        }
        TickSource::Rtt { period_ms } => {
            mcu.vectors().bind(Vector::Timer0CompA, &rtt)?;
            info!(
                "real-time timer: OCR0A={:?} at {} Hz, event every {} ms",
                compare_value_8bit(F_CPU, RTT_PRESCALER),
                F_CPU,
                period_ms
            );
            (Vector::Timer0CompA, &rtt)
        }
        TickSource::Timer { period_ms } => {
            mcu.vectors().bind(Vector::Timer2CompA, &timer)?;
            info!("timer ticks every {} ms", period_ms);
            (Vector::Timer2CompA, &scheduler)
        }
    };
    pin_changes.begin(config.buttons.pins);
    int0.begin();
    irq.enable();

    let edges = press_edges(&config.buttons.presses);
    let mut next_edge = 0;
    let mut event_loop = EventLoop::new(queue, &dispatcher);
    let mut overflows = queue.overflows();

    info!(
        "running {} jobs for {} ms",
        scheduler.len(),
        config.duration_ms
    );
    for now in 1..=config.duration_ms {
        match tick {
            TickSource::Watchdog(timeout) => {
                if now % timeout.millis() == 0 {
                    mcu.raise(tick_vector);
                }
            }
            // Both timers interrupt every millisecond
            TickSource::Rtt { .. } | TickSource::Timer { .. } => mcu.raise(tick_vector),
        }

        while let Some(&(at, pin, level)) = edges.get(next_edge) {
            if at > now {
                break;
            }
            next_edge += 1;
            port.set_pin(pin, level);
            mcu.raise(Vector::PcInt2);
            if pin == INT0_PIN && config.external.enabled {
                mcu.raise(Vector::Int0);
            }
        }

        while let Some(event) = event_loop.run_once() {
            debug!(
                "{} ms: event type {} value {:#04x}",
                now,
                event.kind().as_u8(),
                event.value()
            );
        }

        if queue.overflows() != overflows {
            warn!(
                "{} ms: event queue full, {} events lost so far",
                now,
                queue.overflows()
            );
            overflows = queue.overflows();
        }
    }

    let (clock_ms, leftover) = mcu.synchronized(|| (clock.millis(), queue.len()));
    if leftover > 0 {
        warn!("{} events left in the queue", leftover);
    }

    let report = Report {
        elapsed_ms: config.duration_ms,
        clock_ms,
        scheduler_ms: scheduler.millis(),
        loop_stats: event_loop.stats(),
        overflows: queue.overflows(),
        spurious: mcu.spurious(),
        jobs: jobs
            .iter()
            .map(|job| JobReport {
                name: job.name().to_string(),
                runs: job.runs(),
                led_transitions: job.transitions(),
            })
            .collect(),
        button_presses: buttons.presses(),
        external_events: external.count(),
    };
    info!(
        "done: {} events dispatched, {} unhandled",
        report.loop_stats.events, report.loop_stats.unhandled
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_edges_sorted() {
        let presses = [
            PressConfig {
                pin: 1,
                at_ms: 300,
                hold_ms: 50,
            },
            PressConfig {
                pin: 0,
                at_ms: 100,
                hold_ms: 500,
            },
        ];
        let edges = press_edges(&presses);
        assert_eq!(
            edges,
            [(100, 0, false), (300, 1, false), (350, 1, true), (600, 0, true)]
        );
    }

    #[test]
    fn test_rtt_callback_periods() {
        let queue = DemoQueue::new();
        assert!(rtt_callback(&queue, 1024).is_some());
        assert!(rtt_callback(&queue, 1).is_some());
        assert!(rtt_callback(&queue, 1000).is_none());
    }
}
