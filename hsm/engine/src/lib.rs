#![no_std]
#![forbid(unsafe_code)]

//! # HSM Engine
//!
//! Hierarchical state machine engine for interrupt-driven firmware.
//! Provides:
//! - A static state tree validated once at startup
//! - Exit and entry actions computed from the least common ancestor
//! - Deferred `INITIAL` events for nested initial transitions
//! - A run-to-completion dispatch loop fed by an interrupt-safe queue
//!
//! ```
//! use hsm_engine::{Event, EventQueue, Hierarchy, HsmResult, StateDescriptor, StateHandler, StateId, StateMachine};
//!
//! const TOP: StateId = StateId::new(0);
//! const IDLE: StateId = StateId::new(1);
//! const GO: Event = Event::user(0);
//!
//! enum Demo { Top, Idle }
//!
//! impl StateHandler for Demo {
//!     type Context = u32;
//!
//!     fn handle(&self, sm: &mut StateMachine<'_, Self>, entries: &mut u32, event: Event) -> HsmResult<()> {
//!         match (self, event) {
//!             (Demo::Top, Event::INITIAL) => sm.set_state(entries, IDLE),
//!             (Demo::Idle, Event::ON_ENTRY) => { *entries += 1; Ok(()) }
//!             (Demo::Idle, GO) => sm.set_state(entries, IDLE),
//!             _ => Ok(()),
//!         }
//!     }
//! }
//!
//! static STATES: [StateDescriptor<Demo>; 2] = [
//!     StateDescriptor::root(Demo::Top),
//!     StateDescriptor::child(Demo::Idle, TOP),
//! ];
//! static QUEUE: EventQueue<4> = EventQueue::new();
//!
//! let mut entries = 0;
//! let mut sm = StateMachine::new(Hierarchy::new(&STATES)?, TOP, &QUEUE)?;
//! sm.init(&mut entries)?;
//! sm.send_event(GO)?;
//! sm.process(&mut entries)?;
//! assert_eq!(sm.current_state(), IDLE);
//! assert_eq!(entries, 2);
//! # Ok::<(), hsm_engine::HsmError>(())
//! ```

pub mod hierarchy;
pub mod transition;

pub use hierarchy::*;
pub use hsm_core::*;
pub use hsm_queue::{EventPort, EventQueue, QueueStats};
pub use transition::*;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod tests;

/// Behaviour of one state variant
///
/// Implemented by a closed, application-defined enum with one variant per
/// state. Handlers receive `ON_ENTRY`/`ON_EXIT` during transitions,
/// `INITIAL` at bootstrap and after every transition, and user events from
/// the queue.
pub trait StateHandler: Sized {
    /// Application data shared by all handlers
    type Context;

    /// React to an event while this state is current (or being entered or
    /// exited)
    ///
    /// Must not block. Calling [`StateMachine::set_state`] while handling
    /// `ON_ENTRY` or `ON_EXIT` fails with `ReentrantTransition`. An error
    /// returned from `ON_ENTRY` or `ON_EXIT` does not stop the transition
    /// in progress.
    fn handle(
        &self,
        sm: &mut StateMachine<'_, Self>,
        ctx: &mut Self::Context,
        event: Event,
    ) -> HsmResult<()>;
}

/// State machine execution context
///
/// Bound to a validated hierarchy and to a queue it does not own.
pub struct StateMachine<'a, H: StateHandler> {
    hierarchy: Hierarchy<'a, H>,
    /// Current active state
    current: StateId,
    queue: &'a dyn EventPort,
    /// Set while exit/entry actions run
    in_action: bool,
}

impl<'a, H: StateHandler> StateMachine<'a, H> {
    /// Bind a machine to its initial state and queue
    ///
    /// No handler runs until [`init`](Self::init).
    pub fn new(
        hierarchy: Hierarchy<'a, H>,
        initial: StateId,
        queue: &'a dyn EventPort,
    ) -> HsmResult<Self> {
        if !hierarchy.contains(initial) {
            return Err(HsmError::UnknownState);
        }
        Ok(Self {
            hierarchy,
            current: initial,
            queue,
            in_action: false,
        })
    }

    /// Trigger the bootstrap
    ///
    /// Delivers `INITIAL` to the initial state synchronously; there is no
    /// state to exit yet.
    pub fn init(&mut self, ctx: &mut H::Context) -> HsmResult<()> {
        #[cfg(feature = "defmt")]
        defmt::debug!("hsm init in {}", self.current);

        self.deliver(self.current, ctx, Event::INITIAL)
    }

    /// Get the current state
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Get the hierarchy this machine runs on
    pub fn hierarchy(&self) -> Hierarchy<'a, H> {
        self.hierarchy
    }

    /// Check if the current state is `state` or nested inside it
    pub fn is_in(&self, state: StateId) -> bool {
        self.hierarchy
            .is_ancestor(state, self.current)
            .unwrap_or(false)
    }

    /// Transition to `target`
    ///
    /// Runs exit actions from the current state up to (not including) the
    /// least common ancestor, then entry actions from below it down to
    /// `target`, makes `target` current and queues `INITIAL` so nested
    /// initial transitions happen on the next dispatch. A transition to the
    /// current state exits and re-enters it.
    ///
    /// Path buffers live on this call's stack. Once the plan is computed the
    /// transition always runs to completion: every action fires, `target`
    /// becomes current and `INITIAL` is queued. The first action error is
    /// returned afterwards, otherwise `QueueFull` if `INITIAL` was dropped.
    pub fn set_state(&mut self, ctx: &mut H::Context, target: StateId) -> HsmResult<()> {
        if self.in_action {
            #[cfg(feature = "defmt")]
            defmt::error!("transition to {} requested from an exit/entry action", target);
            return Err(HsmError::ReentrantTransition);
        }

        let plan = self.hierarchy.plan(self.current, target)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("tran {} -> {}: {}", self.current, target, plan);

        self.in_action = true;
        let actions = self.run_actions(ctx, &plan);
        self.in_action = false;

        self.current = target;
        let posted = self.queue.post(Event::INITIAL);
        actions.and(posted)
    }

    /// Fire every exit then entry action, keeping the first error
    fn run_actions(&mut self, ctx: &mut H::Context, plan: &TransitionPlan) -> HsmResult<()> {
        let mut result = Ok(());
        let exits = plan.exits().iter().map(|&state| (state, Event::ON_EXIT));
        let entries = plan.entries().iter().map(|&state| (state, Event::ON_ENTRY));
        for (state, event) in exits.chain(entries) {
            let fired = self.deliver(state, ctx, event);
            if result.is_ok() {
                result = fired;
            }
        }
        result
    }

    /// Queue an event for this machine
    ///
    /// Returns `Err(HsmError::QueueFull)` when the event was dropped.
    pub fn send_event(&self, event: Event) -> HsmResult<()> {
        self.queue.post(event)
    }

    /// Dispatch one queued event to the current state
    ///
    /// Returns `Ok(false)` when the queue was empty.
    pub fn step(&mut self, ctx: &mut H::Context) -> HsmResult<bool> {
        match self.queue.fetch() {
            Ok(event) => {
                self.deliver(self.current, ctx, event)?;
                Ok(true)
            }
            Err(HsmError::QueueEmpty) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Dispatch queued events until the queue is empty
    ///
    /// Events queued by handlers, including the `INITIAL` events of
    /// transitions, are dispatched in the same call. Returns the number of
    /// events dispatched. A handler error does not stop the loop; the first
    /// one is returned once the queue is drained.
    pub fn process(&mut self, ctx: &mut H::Context) -> HsmResult<usize> {
        let mut dispatched = 0;
        let mut first_error = None;
        loop {
            match self.queue.fetch() {
                Ok(event) => {
                    dispatched += 1;
                    if let Err(e) = self.deliver(self.current, ctx, event) {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("handler of {} failed on {}: {}", self.current, event, e);
                        first_error.get_or_insert(e);
                    }
                }
                Err(HsmError::QueueEmpty) => break,
                Err(e) => return Err(e),
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(dispatched),
        }
    }

    fn deliver(&mut self, state: StateId, ctx: &mut H::Context, event: Event) -> HsmResult<()> {
        let handler = self.hierarchy.handler(state)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("dispatch {} to {}", event, state);

        handler.handle(self, ctx, event)
    }
}

#[cfg(feature = "defmt")]
impl<H: StateHandler> defmt::Format for StateMachine<'_, H> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "StateMachine{{ current: {} }}", self.current);
    }
}
