//! Host simulation of an ATmega328P running the avrio substrate
//!
//! Interrupt sources, the event queue, the dispatcher and the scheduler are
//! the real `avrio-core` types; only the chip around them is simulated
//! ([`SimMcu`] plus the `avrio-hal-host` port).

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod mcu;

pub use app::{run_simulation, JobReport, Report};
pub use config::DemoConfig;
pub use error::DemoError;
pub use mcu::SimMcu;

use avrio_core::{Event, SharedQueue};

/// Event queue slots (15 usable)
pub const QUEUE_SIZE: usize = 16;

/// Most jobs the scheduler holds
pub const MAX_JOBS: usize = 8;

/// Most event handlers the dispatcher holds
pub const MAX_HANDLERS: usize = 4;

/// Events carry one byte: port levels for pin changes, unused otherwise
pub type DemoEvent = Event<u8>;

/// Queue between the simulated interrupt handlers and the foreground loop
pub type DemoQueue = SharedQueue<DemoEvent, QUEUE_SIZE>;
