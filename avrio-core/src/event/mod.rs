//! Events and their dispatch
//!
//! Interrupt handlers describe "what happened" as a small [`Event`] and
//! queue it; the foreground loop hands each dequeued event to the
//! [`Dispatcher`], which calls every [`EventHandler`] registered for the
//! event's type.

pub mod dispatcher;
pub mod types;

pub use dispatcher::{DispatchError, Dispatcher, EventHandler, FnHandler};
pub use types::{Event, EventType};
