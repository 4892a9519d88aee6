//! avrio Hardware Abstraction Layer
//!
//! This crate defines the hardware seams the event substrate depends on.
//! Chip ports (AVR targets, or the host simulation in `avrio-hal-host`)
//! implement them; `avrio-core` only ever talks to these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (avrio-demo, firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  avrio-core (queue, events, scheduler)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  avrio-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  AVR targets  │       │ avrio-hal-host│
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`interrupt::InterruptControl`] - Global interrupt-enable flag
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::InputPort`] - Digital I/O
//! - [`power::WaitForInterrupt`] - Idle until the next interrupt

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod interrupt;
pub mod power;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, InputPort, OutputPin};
pub use interrupt::InterruptControl;
pub use power::WaitForInterrupt;
