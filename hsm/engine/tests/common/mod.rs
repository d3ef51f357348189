//! Shared helpers for hsm-engine integration tests

#![allow(dead_code)]

use hsm_engine::{Event, HsmResult, StateDescriptor, StateHandler, StateId, StateMachine};

/// Handler that records every action and treats user event `n` as
/// "transition to state `n`"
pub struct Probe(pub StateId);

#[derive(Default)]
pub struct Trace {
    pub log: Vec<(StateId, Event)>,
}

impl Trace {
    /// Exit/entry actions only, in firing order
    pub fn actions(&self) -> Vec<(StateId, Event)> {
        self.log
            .iter()
            .copied()
            .filter(|(_, event)| *event == Event::ON_ENTRY || *event == Event::ON_EXIT)
            .collect()
    }
}

impl StateHandler for Probe {
    type Context = Trace;

    fn handle(&self, sm: &mut StateMachine<'_, Self>, trace: &mut Trace, event: Event) -> HsmResult<()> {
        trace.log.push((self.0, event));
        if event.is_reserved() {
            return Ok(());
        }
        let target = StateId::new((event.raw() - Event::USER.raw()) as u8);
        sm.set_state(trace, target)
    }
}

/// Event asking the machine to transition to `state`
pub fn goto(state: StateId) -> Event {
    Event::user(state.raw() as u16)
}

/// Build a descriptor table from a parent list; `parents[i] == i` marks a root
pub fn table(parents: &[u8]) -> Vec<StateDescriptor<Probe>> {
    parents
        .iter()
        .enumerate()
        .map(|(index, &parent)| {
            let id = StateId::new(index as u8);
            if parent as usize == index {
                StateDescriptor::root(Probe(id))
            } else {
                StateDescriptor::child(Probe(id), StateId::new(parent))
            }
        })
        .collect()
}

/// Ancestors of `state`, itself first, computed straight from the parent list
pub fn ancestors(parents: &[u8], state: u8) -> Vec<StateId> {
    let mut path = vec![StateId::new(state)];
    let mut current = state;
    while parents[current as usize] != current {
        current = parents[current as usize];
        path.push(StateId::new(current));
    }
    path
}

pub fn exit(state: StateId) -> (StateId, Event) {
    (state, Event::ON_EXIT)
}

pub fn entry(state: StateId) -> (StateId, Event) {
    (state, Event::ON_ENTRY)
}
