//! State transition plans

use heapless::Vec;
use hsm_core::{HsmError, HsmResult, StateId, MAX_DEPTH};

/// Exit and entry sets of one transition, in firing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// States to exit (from innermost to outermost)
    exit_path: Vec<StateId, MAX_DEPTH>,
    /// States to enter (from outermost to innermost)
    entry_path: Vec<StateId, MAX_DEPTH>,
    /// Deepest state neither exited nor entered
    lca: Option<StateId>,
}

impl TransitionPlan {
    /// Create a new empty plan
    pub const fn new() -> Self {
        Self {
            exit_path: Vec::new(),
            entry_path: Vec::new(),
            lca: None,
        }
    }

    /// Add a state to exit
    pub fn add_exit(&mut self, state: StateId) -> HsmResult<()> {
        self.exit_path
            .push(state)
            .map_err(|_| HsmError::DepthExceeded)
    }

    /// Add a state to enter
    pub fn add_entry(&mut self, state: StateId) -> HsmResult<()> {
        self.entry_path
            .push(state)
            .map_err(|_| HsmError::DepthExceeded)
    }

    pub(crate) fn set_lca(&mut self, lca: Option<StateId>) {
        self.lca = lca;
    }

    /// States whose exit action fires, innermost first
    pub fn exits(&self) -> &[StateId] {
        &self.exit_path
    }

    /// States whose entry action fires, outermost first
    pub fn entries(&self) -> &[StateId] {
        &self.entry_path
    }

    /// Least common ancestor of source and target
    ///
    /// `None` when the two states share no root. For a self-transition this
    /// is the state's parent.
    pub fn lca(&self) -> Option<StateId> {
        self.lca
    }
}

impl Default for TransitionPlan {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransitionPlan {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "TransitionPlan{{ exit: {}, entry: {}, lca: {} }}",
            self.exit_path.as_slice(),
            self.entry_path.as_slice(),
            self.lca
        );
    }
}
