//! Interrupt-side event sources
//!
//! Each source owns the body of one interrupt handler: it updates its own
//! counters and pushes at most one event into a [`SharedQueue`] given at
//! construction. Sources implement [`InterruptHandler`] so they can be bound
//! directly into a [`VectorTable`].
//!
//! [`SharedQueue`]: crate::SharedQueue
//! [`InterruptHandler`]: crate::InterruptHandler
//! [`VectorTable`]: crate::VectorTable

pub mod int;
pub mod pci;
pub mod rtt;
pub mod timer;
pub mod watchdog;

pub use int::{ExternalInterruptEvents, InterruptTrigger};
pub use pci::PinChangeEvents;
pub use rtt::{RealTimeTimer, RttEventCallback, RttListener};
pub use timer::TimerTicks;
pub use watchdog::{WatchdogClock, WatchdogTimeout};
