//! Event codes for the HSM engine

use core::fmt;

/// Opaque event code delivered to state handlers.
///
/// Codes below [`Event::USER`] are reserved for the engine's lifecycle
/// signals; application events start at `USER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event(pub u16);

impl Event {
    /// Delivered once at bootstrap and after every transition
    pub const INITIAL: Event = Event(0);
    /// Entry action of a state
    pub const ON_ENTRY: Event = Event(1);
    /// Exit action of a state
    pub const ON_EXIT: Event = Event(2);

    /// First user-defined event
    pub const USER: Event = Event(3);

    /// Create an event from a raw code
    pub const fn new(code: u16) -> Self {
        Event(code)
    }

    /// Create the `offset`-th user event
    ///
    /// Offsets past the last code saturate at `u16::MAX`.
    pub const fn user(offset: u16) -> Self {
        Event(Self::USER.0.saturating_add(offset))
    }

    /// Get the raw event code
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Check if this is one of the engine's lifecycle signals
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::USER.0
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::INITIAL => write!(f, "INITIAL"),
            Event::ON_ENTRY => write!(f, "ON_ENTRY"),
            Event::ON_EXIT => write!(f, "ON_EXIT"),
            Event(code) => write!(f, "Event({})", code),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Event {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Event({})", self.0);
    }
}

/// Macro to declare application event constants
///
/// ```
/// hsm_core::define_events! {
///     pub TICK = 0,
///     pub BUTTON = 1,
/// }
/// assert_eq!(TICK, hsm_core::Event::USER);
/// ```
#[macro_export]
macro_rules! define_events {
    (
        $(
            $vis:vis $name:ident = $offset:expr
        ),* $(,)?
    ) => {
        $(
            $vis const $name: $crate::Event = $crate::Event::user($offset);
        )*
    };
}
