//! Event records

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One-byte event type tag
///
/// Values below [`EventType::USER_EVENT`] are reserved for the library's
/// own sources; applications number their types from `USER_EVENT` up,
/// usually through [`EventType::user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventType(u8);

impl EventType {
    /// Placeholder type of a default-constructed event
    pub const NO_EVENT: Self = Self(0);
    /// Watchdog timer tick
    pub const WDT_TIMER: Self = Self(1);
    /// Real-time timer period elapsed
    pub const RTT_TIMER: Self = Self(2);
    /// Timer compare-match tick
    pub const TIMER_TICK: Self = Self(3);
    /// Pin-change interrupt; payload is the port levels
    pub const PIN_CHANGE: Self = Self(4);
    /// External interrupt (INTn); payload is the pin level
    pub const EXT_INTERRUPT: Self = Self(5);
    /// First application-defined type
    pub const USER_EVENT: Self = Self(128);

    /// Create a type from its raw tag
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Application-defined type number `offset` (`USER_EVENT + offset`)
    ///
    /// Only the low 7 bits of `offset` are used.
    pub const fn user(offset: u8) -> Self {
        Self(Self::USER_EVENT.0 | (offset & 0x7F))
    }

    /// Raw tag value
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Check if this is an application-defined type
    pub const fn is_user(self) -> bool {
        self.0 >= Self::USER_EVENT.0
    }
}

impl From<u8> for EventType {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl From<EventType> for u8 {
    fn from(kind: EventType) -> Self {
        kind.0
    }
}

/// Something that happened, with an optional small payload
///
/// Events are plain values: they are copied into a queue inside an
/// interrupt handler and copied out again by the foreground loop. The
/// payload type is chosen by the application (`()` for pure signals, `u8`
/// for a port snapshot, ...); its meaning depends on [`Event::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event<T: Copy = ()> {
    kind: EventType,
    value: T,
}

impl<T: Copy> Event<T> {
    /// Create an event with a payload
    pub const fn new(kind: EventType, value: T) -> Self {
        Self { kind, value }
    }

    /// Event type
    pub const fn kind(&self) -> EventType {
        self.kind
    }

    /// Event payload
    pub const fn value(&self) -> T {
        self.value
    }

    /// Check the event type
    pub fn is(&self, kind: EventType) -> bool {
        self.kind == kind
    }
}

impl<T: Copy + Default> Event<T> {
    /// Create an event whose payload carries no information
    pub fn signal(kind: EventType) -> Self {
        Self::new(kind, T::default())
    }
}
