//! State hierarchy table and ancestor queries

use core::sync::atomic::{AtomicU8, Ordering};

use heapless::Vec;
use hsm_core::{HsmError, HsmResult, StateId, MAX_DEPTH};

use crate::TransitionPlan;

/// Path from a state up to its root, innermost state first
pub type StatePath = Vec<StateId, MAX_DEPTH>;

/// Upper bound on the number of states addressable by a `StateId`
pub const MAX_STATES: usize = u8::MAX as usize + 1;

/// One node of the state tree
///
/// A root state is its own parent. Descriptors are declared once, usually in
/// a `static` table, and never change afterwards except for the history slot.
pub struct StateDescriptor<H> {
    handler: H,
    // None means self-parented
    parent: Option<StateId>,
    history: AtomicU8,
}

impl<H> StateDescriptor<H> {
    /// Declare a root state
    pub const fn root(handler: H) -> Self {
        Self {
            handler,
            parent: None,
            history: AtomicU8::new(0),
        }
    }

    /// Declare a state nested inside `parent`
    pub const fn child(handler: H, parent: StateId) -> Self {
        Self {
            handler,
            parent: Some(parent),
            history: AtomicU8::new(0),
        }
    }

    /// Get the state's handler
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Validated view over a table of state descriptors
///
/// A state's `StateId` is its position in the table.
pub struct Hierarchy<'a, H> {
    states: &'a [StateDescriptor<H>],
}

impl<H> Clone for Hierarchy<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Hierarchy<'_, H> {}

impl<'a, H> Hierarchy<'a, H> {
    /// Validate a descriptor table
    ///
    /// Every parent must name a state of the table and every parent chain
    /// must reach a self-parented root within `MAX_DEPTH` states. Each
    /// history slot is reset to its own state.
    pub fn new(states: &'a [StateDescriptor<H>]) -> HsmResult<Self> {
        if states.is_empty() {
            return Err(HsmError::EmptyHierarchy);
        }
        if states.len() > MAX_STATES {
            return Err(HsmError::MalformedHierarchy);
        }

        let hierarchy = Self { states };
        for index in 0..states.len() {
            hierarchy.validate_chain(StateId::new(index as u8))?;
        }
        // Only a valid table gets its history reset
        for (index, descriptor) in states.iter().enumerate() {
            descriptor.history.store(index as u8, Ordering::Relaxed);
        }
        Ok(hierarchy)
    }

    fn validate_chain(&self, id: StateId) -> HsmResult<()> {
        let mut state = id;
        let mut depth = 1;
        // A chain longer than the table must contain a cycle
        for _ in 0..self.states.len() {
            let parent = self.descriptor(state)?.parent.unwrap_or(state);
            if parent.index() >= self.states.len() {
                return Err(HsmError::UnknownState);
            }
            if parent == state {
                return if depth > MAX_DEPTH {
                    Err(HsmError::DepthExceeded)
                } else {
                    Ok(())
                };
            }
            state = parent;
            depth += 1;
        }
        Err(HsmError::MalformedHierarchy)
    }

    /// Number of states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false for a validated hierarchy
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Check that `id` names a state of this hierarchy
    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    /// Look up a state's descriptor
    pub fn descriptor(&self, id: StateId) -> HsmResult<&'a StateDescriptor<H>> {
        self.states.get(id.index()).ok_or(HsmError::UnknownState)
    }

    /// Look up a state's handler
    pub fn handler(&self, id: StateId) -> HsmResult<&'a H> {
        self.descriptor(id).map(StateDescriptor::handler)
    }

    /// Parent of a state; a root returns itself
    pub fn parent(&self, id: StateId) -> HsmResult<StateId> {
        Ok(self.descriptor(id)?.parent.unwrap_or(id))
    }

    /// Check if a state is a root
    pub fn is_root(&self, id: StateId) -> HsmResult<bool> {
        Ok(self.parent(id)? == id)
    }

    /// Read a state's history slot
    ///
    /// The engine never reads or writes history; it is left to embedding code.
    pub fn history(&self, id: StateId) -> HsmResult<StateId> {
        Ok(StateId::new(self.descriptor(id)?.history.load(Ordering::Relaxed)))
    }

    /// Write a state's history slot
    pub fn set_history(&self, id: StateId, remembered: StateId) -> HsmResult<()> {
        if !self.contains(remembered) {
            return Err(HsmError::UnknownState);
        }
        self.descriptor(id)?
            .history
            .store(remembered.raw(), Ordering::Relaxed);
        Ok(())
    }

    /// Get the path from a state to the top of the hierarchy
    ///
    /// The path starts with `id` and ends with its root. Fails with
    /// `DepthExceeded` instead of overrunning the path buffer.
    pub fn path_to_root(&self, id: StateId) -> HsmResult<StatePath> {
        let mut path = StatePath::new();
        let mut state = id;
        loop {
            path.push(state).map_err(|_| HsmError::DepthExceeded)?;
            let parent = self.parent(state)?;
            if parent == state {
                return Ok(path);
            }
            state = parent;
        }
    }

    /// Nesting depth of a state, 1 for a root
    pub fn depth(&self, id: StateId) -> HsmResult<usize> {
        self.path_to_root(id).map(|path| path.len())
    }

    /// Check if `ancestor` is `state` or encloses it
    pub fn is_ancestor(&self, ancestor: StateId, state: StateId) -> HsmResult<bool> {
        Ok(self.path_to_root(state)?.contains(&ancestor))
    }

    /// Find the Least Common Ancestor of two states
    ///
    /// `None` when the states live in different trees.
    pub fn lca(&self, source: StateId, target: StateId) -> HsmResult<Option<StateId>> {
        let up = self.path_to_root(source)?;
        let down = self.path_to_root(target)?;
        let shared = common_tail(&up, &down);
        Ok((shared > 0).then(|| up[up.len() - shared]))
    }

    /// Compute the exit and entry sets of a transition
    pub fn plan(&self, source: StateId, target: StateId) -> HsmResult<TransitionPlan> {
        let mut plan = TransitionPlan::new();

        if source == target {
            let parent = self.parent(source)?;
            plan.add_exit(source)?;
            plan.add_entry(source)?;
            plan.set_lca((parent != source).then_some(parent));
            return Ok(plan);
        }

        let up = self.path_to_root(source)?;
        let down = self.path_to_root(target)?;
        let shared = common_tail(&up, &down);

        // Leaf-to-root below the LCA
        for &state in &up[..up.len() - shared] {
            plan.add_exit(state)?;
        }
        // Root-to-leaf below the LCA
        for &state in down[..down.len() - shared].iter().rev() {
            plan.add_entry(state)?;
        }
        plan.set_lca((shared > 0).then(|| up[up.len() - shared]));

        Ok(plan)
    }
}

/// Number of equal entries at the root ends of two paths
fn common_tail(up: &[StateId], down: &[StateId]) -> usize {
    up.iter()
        .rev()
        .zip(down.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: StateId = StateId(0);
    const A: StateId = StateId(1);
    const A1: StateId = StateId(2);
    const B: StateId = StateId(3);

    static TABLE: [StateDescriptor<()>; 4] = [
        StateDescriptor::root(()),
        StateDescriptor::child((), ROOT),
        StateDescriptor::child((), A),
        StateDescriptor::child((), ROOT),
    ];

    #[test]
    fn test_path_to_root() {
        let hierarchy = Hierarchy::new(&TABLE).unwrap();
        let path = hierarchy.path_to_root(A1).unwrap();
        assert_eq!(path.as_slice(), &[A1, A, ROOT]);
        assert_eq!(hierarchy.depth(ROOT), Ok(1));
        assert_eq!(hierarchy.depth(A1), Ok(3));
    }

    #[test]
    fn test_lca() {
        let hierarchy = Hierarchy::new(&TABLE).unwrap();
        assert_eq!(hierarchy.lca(A1, B), Ok(Some(ROOT)));
        assert_eq!(hierarchy.lca(A1, A), Ok(Some(A)));
        assert_eq!(hierarchy.lca(B, B), Ok(Some(B)));
    }

    #[test]
    fn test_common_tail() {
        assert_eq!(common_tail(&[A1, A, ROOT], &[B, ROOT]), 1);
        assert_eq!(common_tail(&[A1, A, ROOT], &[A, ROOT]), 2);
        assert_eq!(common_tail(&[A], &[B]), 0);
    }

    #[test]
    fn test_history_starts_self_referential() {
        let hierarchy = Hierarchy::new(&TABLE).unwrap();
        assert_eq!(hierarchy.history(A1), Ok(A1));
        assert_eq!(hierarchy.history(ROOT), Ok(ROOT));
    }

    #[test]
    fn test_rejected_table_keeps_history() {
        static BROKEN: [StateDescriptor<()>; 3] = [
            StateDescriptor::root(()),
            StateDescriptor::child((), ROOT),
            StateDescriptor::child((), StateId(9)),
        ];
        BROKEN[1].history.store(7, Ordering::Relaxed);

        assert!(matches!(Hierarchy::new(&BROKEN), Err(HsmError::UnknownState)));
        assert_eq!(BROKEN[1].history.load(Ordering::Relaxed), 7);
    }
}
