//! Configuration types
//!
//! Board-agnostic settings for the clock that drives the scheduler. With
//! the `serde` feature they can be read from any serde format.

pub mod types;

pub use types::*;
