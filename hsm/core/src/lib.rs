#![no_std]
#![forbid(unsafe_code)]

//! # HSM Core
//!
//! Core types shared by the hierarchical state machine engine and its event
//! queue: event codes, state identifiers and the error type.

#[cfg(feature = "std")]
extern crate std;

use core::fmt;

pub mod events;
pub mod states;

pub use events::*;
pub use states::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum nesting depth of a hierarchy, root included.
///
/// Sizes the per-transition path buffers; a chain of parents longer than
/// this is rejected when the hierarchy is validated.
pub const MAX_DEPTH: usize = 16;

/// Result type used throughout the engine
pub type HsmResult<T> = Result<T, HsmError>;

/// Error types for engine operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HsmError {
    /// Event queue is full, the event was dropped
    QueueFull,
    /// Event queue is empty
    QueueEmpty,
    /// A parent chain is longer than `MAX_DEPTH`
    DepthExceeded,
    /// State id does not name a state of the hierarchy
    UnknownState,
    /// A parent chain never reaches a self-parented root
    MalformedHierarchy,
    /// Hierarchy has no states
    EmptyHierarchy,
    /// Transition requested from inside an exit or entry action
    ReentrantTransition,
}

impl fmt::Display for HsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HsmError::QueueFull => write!(f, "Event queue is full"),
            HsmError::QueueEmpty => write!(f, "Event queue is empty"),
            HsmError::DepthExceeded => write!(f, "State nesting exceeds {} levels", MAX_DEPTH),
            HsmError::UnknownState => write!(f, "Unknown state"),
            HsmError::MalformedHierarchy => write!(f, "Parent chain does not reach a root state"),
            HsmError::EmptyHierarchy => write!(f, "Hierarchy has no states"),
            HsmError::ReentrantTransition => write!(f, "Transition requested during exit/entry action"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HsmError {}

#[cfg(feature = "defmt")]
impl defmt::Format for HsmError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            HsmError::QueueFull => defmt::write!(fmt, "QueueFull"),
            HsmError::QueueEmpty => defmt::write!(fmt, "QueueEmpty"),
            HsmError::DepthExceeded => defmt::write!(fmt, "DepthExceeded"),
            HsmError::UnknownState => defmt::write!(fmt, "UnknownState"),
            HsmError::MalformedHierarchy => defmt::write!(fmt, "MalformedHierarchy"),
            HsmError::EmptyHierarchy => defmt::write!(fmt, "EmptyHierarchy"),
            HsmError::ReentrantTransition => defmt::write!(fmt, "ReentrantTransition"),
        }
    }
}
