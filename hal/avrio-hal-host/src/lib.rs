//! Host simulation port for the avrio HAL
//!
//! Implements the `avrio-hal` traits with plain atomics so the event
//! substrate, its handlers and whole applications can run and be tested on
//! a workstation:
//!
//! - [`interrupt::SimInterrupts`] - simulated `SREG.I` flag
//! - [`gpio::SimPort`] - 8-bit input port whose levels tests can drive
//! - [`gpio::SimPin`] - output pin that records its transitions
//! - [`power::SpinWait`] - idle strategy that spins and counts idle rounds

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod interrupt;
pub mod power;

pub use gpio::{SimPin, SimPort};
pub use interrupt::SimInterrupts;
pub use power::SpinWait;

// Re-export shared traits from avrio-hal for convenience
pub use avrio_hal::{InputPin, InputPort, InterruptControl, OutputPin, WaitForInterrupt};
