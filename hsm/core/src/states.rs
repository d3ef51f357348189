//! State identifiers

use core::fmt;

/// Index of a state in its hierarchy table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u8);

impl StateId {
    /// Create a state id from a table index
    pub const fn new(index: u8) -> Self {
        StateId(index)
    }

    /// Get the raw index
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Table index as `usize`
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "State({})", self.0);
    }
}

/// Macro to declare state id constants matching table positions
///
/// ```
/// hsm_core::state_ids! {
///     pub ROOT,
///     pub IDLE,
/// }
/// assert_eq!(IDLE.raw(), 1);
/// ```
#[macro_export]
macro_rules! state_ids {
    (@step $idx:expr; $vis:vis $name:ident, $($rest_vis:vis $rest:ident,)*) => {
        $vis const $name: $crate::StateId = $crate::StateId::new($idx);
        $crate::state_ids!(@step $idx + 1u8; $($rest_vis $rest,)*);
    };
    (@step $idx:expr;) => {};
    ($($vis:vis $name:ident),* $(,)?) => {
        $crate::state_ids!(@step 0u8; $($vis $name,)*);
    };
}
