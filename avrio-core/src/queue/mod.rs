//! Queues for handing data from interrupt handlers to the foreground loop
//!
//! [`Queue`] is the raw ring buffer; [`SharedQueue`] wraps it so that an
//! interrupt handler can push while the foreground pops.

pub mod ring;
pub mod shared;

pub use ring::Queue;
pub use shared::SharedQueue;
