#![no_std]
#![forbid(unsafe_code)]

//! # HSM Event Queue
//!
//! Fixed-capacity circular event buffer feeding a state machine.
//!
//! Producers may run in interrupt context: every insertion is bracketed by a
//! critical section provided by the platform's `critical-section`
//! implementation. The queue has exactly one consumer, the machine's
//! dispatch loop.

pub mod queue;
pub mod stats;

pub use hsm_core::*;
pub use queue::*;
pub use stats::*;

/// Default event queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Largest supported queue capacity (indices are `u8`)
pub const MAX_QUEUE_CAPACITY: usize = 255;
