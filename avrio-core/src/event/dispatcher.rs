//! Routing events to handlers
//!
//! The dispatcher keeps non-owning references to its handlers, in
//! registration order. Dispatch runs in the foreground only, so handlers
//! take `&self` and keep whatever state they need in `Cell`/`RefCell`.

use heapless::Vec;

use super::types::{Event, EventType};
use crate::same_object;

/// Errors when registering a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// All handler slots are taken
    Full,
    /// This handler is already registered
    AlreadyRegistered,
}

/// Foreground reaction to one type of event
pub trait EventHandler<T: Copy = ()> {
    /// The single event type this handler wants
    fn event_type(&self) -> EventType;

    /// Handle one event of [`event_type`](EventHandler::event_type)
    ///
    /// Runs in the foreground loop; must return promptly, nothing else is
    /// processed meanwhile.
    fn on_event(&self, event: &Event<T>);
}

/// Event handler built from a closure
pub struct FnHandler<F> {
    kind: EventType,
    callback: F,
}

impl<F> FnHandler<F> {
    /// Call `callback` for every event of type `kind`
    pub const fn new(kind: EventType, callback: F) -> Self {
        Self { kind, callback }
    }
}

impl<T: Copy, F: Fn(&Event<T>)> EventHandler<T> for FnHandler<F> {
    fn event_type(&self) -> EventType {
        self.kind
    }

    fn on_event(&self, event: &Event<T>) {
        (self.callback)(event)
    }
}

/// Registry of up to `H` handlers
pub struct Dispatcher<'h, T: Copy, const H: usize> {
    handlers: Vec<&'h dyn EventHandler<T>, H>,
}

impl<'h, T: Copy, const H: usize> Dispatcher<'h, T, H> {
    /// Create an empty dispatcher
    pub const fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler after all previously registered ones
    pub fn insert(&mut self, handler: &'h dyn EventHandler<T>) -> Result<(), DispatchError> {
        if self.contains(handler) {
            return Err(DispatchError::AlreadyRegistered);
        }
        self.handlers
            .push(handler)
            .map_err(|_| DispatchError::Full)
    }

    /// Unregister a handler
    ///
    /// Returns `false` if it was not registered. Order of the remaining
    /// handlers is preserved.
    pub fn remove(&mut self, handler: &dyn EventHandler<T>) -> bool {
        match self.handlers.iter().position(|h| same_object(*h, handler)) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check if a handler is registered
    pub fn contains(&self, handler: &dyn EventHandler<T>) -> bool {
        self.handlers.iter().any(|h| same_object(*h, handler))
    }

    /// Deliver `event` to every handler registered for its type
    ///
    /// Handlers are called in registration order. Returns how many were
    /// called; 0 means nobody wanted the event and it is simply dropped.
    pub fn dispatch(&self, event: &Event<T>) -> usize {
        let mut delivered = 0;
        for handler in self.handlers.iter() {
            if handler.event_type() == event.kind() {
                handler.on_event(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Unregister all handlers
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<T: Copy, const H: usize> Default for Dispatcher<'_, T, H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    const TYPE_A: EventType = EventType::user(1);
    const TYPE_B: EventType = EventType::user(2);

    /// Handler that appends `(id, payload)` to a shared log
    struct Recorder<'l> {
        id: u8,
        kind: EventType,
        log: &'l RefCell<std::vec::Vec<(u8, u8)>>,
    }

    impl EventHandler<u8> for Recorder<'_> {
        fn event_type(&self) -> EventType {
            self.kind
        }

        fn on_event(&self, event: &Event<u8>) {
            self.log.borrow_mut().push((self.id, event.value()));
        }
    }

    #[test]
    fn test_dispatch_routing() {
        let log = RefCell::new(std::vec::Vec::new());
        let h1 = Recorder { id: 1, kind: TYPE_A, log: &log };
        let h2 = Recorder { id: 2, kind: TYPE_B, log: &log };
        let h3 = Recorder { id: 3, kind: TYPE_A, log: &log };

        let mut dispatcher: Dispatcher<u8, 4> = Dispatcher::new();
        dispatcher.insert(&h1).unwrap();
        dispatcher.insert(&h2).unwrap();
        dispatcher.insert(&h3).unwrap();

        assert_eq!(dispatcher.dispatch(&Event::new(TYPE_A, 42)), 2);
        assert_eq!(*log.borrow(), [(1, 42), (3, 42)]);
    }

    #[test]
    fn test_unmatched_event_is_dropped() {
        let log = RefCell::new(std::vec::Vec::new());
        let h1 = Recorder { id: 1, kind: TYPE_A, log: &log };

        let mut dispatcher: Dispatcher<u8, 2> = Dispatcher::new();
        dispatcher.insert(&h1).unwrap();

        assert_eq!(dispatcher.dispatch(&Event::new(TYPE_B, 1)), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_insert_errors() {
        let log = RefCell::new(std::vec::Vec::new());
        let h1 = Recorder { id: 1, kind: TYPE_A, log: &log };
        let h2 = Recorder { id: 2, kind: TYPE_A, log: &log };

        let mut dispatcher: Dispatcher<u8, 1> = Dispatcher::new();
        assert_eq!(dispatcher.insert(&h1), Ok(()));
        assert_eq!(dispatcher.insert(&h1), Err(DispatchError::AlreadyRegistered));
        assert_eq!(dispatcher.insert(&h2), Err(DispatchError::Full));
    }

    #[test]
    fn test_remove_keeps_order() {
        let log = RefCell::new(std::vec::Vec::new());
        let h1 = Recorder { id: 1, kind: TYPE_A, log: &log };
        let h2 = Recorder { id: 2, kind: TYPE_A, log: &log };
        let h3 = Recorder { id: 3, kind: TYPE_A, log: &log };

        let mut dispatcher: Dispatcher<u8, 4> = Dispatcher::new();
        dispatcher.insert(&h1).unwrap();
        dispatcher.insert(&h2).unwrap();
        dispatcher.insert(&h3).unwrap();

        assert!(dispatcher.remove(&h2));
        assert!(!dispatcher.remove(&h2));
        assert_eq!(dispatcher.len(), 2);

        dispatcher.dispatch(&Event::new(TYPE_A, 0));
        assert_eq!(*log.borrow(), [(1, 0), (3, 0)]);
    }

    #[test]
    fn test_closure_handler() {
        let count = core::cell::Cell::new(0u8);
        let handler = FnHandler::new(EventType::PIN_CHANGE, |event: &Event<u8>| {
            count.set(count.get() + event.value());
        });

        let mut dispatcher: Dispatcher<u8, 1> = Dispatcher::new();
        dispatcher.insert(&handler).unwrap();
        dispatcher.dispatch(&Event::new(EventType::PIN_CHANGE, 2));
        dispatcher.dispatch(&Event::new(EventType::PIN_CHANGE, 3));
        dispatcher.dispatch(&Event::new(EventType::WDT_TIMER, 100));
        assert_eq!(count.get(), 5);
    }
}
