//! Interrupt-driven event and scheduling substrate for 8-bit AVR
//!
//! This crate contains everything between "an interrupt fired" and "the
//! application reacted to it", independent of any particular chip:
//!
//! - Fixed-capacity ring buffers shared between interrupt and foreground code
//! - Scoped critical sections over the global interrupt flag
//! - Events, handlers and the dispatcher that routes them
//! - The periodic job scheduler driven by timer tick events
//! - Interrupt vector registration
//! - Interrupt-side event sources (watchdog, real-time timer, pin change, ...)
//!
//! Nothing allocates; every capacity is a const generic.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod event;
pub mod event_loop;
pub mod isr;
pub mod queue;
pub mod scheduler;
pub mod sources;
pub mod sync;
pub mod time;

pub use event::{Dispatcher, Event, EventHandler, EventType};
pub use event_loop::EventLoop;
pub use isr::{InterruptHandler, Vector, VectorTable};
pub use queue::{Queue, SharedQueue};
pub use scheduler::{Job, JobTiming, Scheduler};
pub use sync::{synchronized, Synchronized};
pub use time::Clock;

/// Compare two references by the address of the object they point to
///
/// Vtable pointers are ignored: the same object seen through two different
/// trait object types still compares equal.
pub(crate) fn same_object<A: ?Sized, B: ?Sized>(a: &A, b: &B) -> bool {
    core::ptr::eq(a as *const A as *const (), b as *const B as *const ())
}
