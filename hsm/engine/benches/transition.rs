//! # Transition Engine Benchmarks
//!
//! Measures the worst-case cost of planning and executing transitions on a
//! chain of `MAX_DEPTH` nested states, and the dispatch loop draining a full
//! queue.
//!
//! ```bash
//! cargo bench --package hsm-engine --bench transition
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hsm_engine::{
    Event, EventQueue, Hierarchy, HsmResult, StateDescriptor, StateHandler, StateId, StateMachine,
    MAX_DEPTH,
};

struct Nested;

impl StateHandler for Nested {
    type Context = u32;

    fn handle(&self, sm: &mut StateMachine<'_, Self>, actions: &mut u32, event: Event) -> HsmResult<()> {
        match event {
            Event::ON_ENTRY | Event::ON_EXIT => {
                *actions += 1;
                Ok(())
            }
            Event::INITIAL => Ok(()),
            other => sm.set_state(actions, StateId::new((other.raw() - Event::USER.raw()) as u8)),
        }
    }
}

fn chain() -> Vec<StateDescriptor<Nested>> {
    (0..MAX_DEPTH as u8)
        .map(|i| {
            if i == 0 {
                StateDescriptor::root(Nested)
            } else {
                StateDescriptor::child(Nested, StateId::new(i - 1))
            }
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let states = chain();
    let hierarchy = Hierarchy::new(&states).unwrap();
    let leaf = StateId::new(MAX_DEPTH as u8 - 1);

    c.bench_function("plan_root_to_deepest_leaf", |b| {
        b.iter(|| hierarchy.plan(black_box(StateId::new(0)), black_box(leaf)).unwrap())
    });
    c.bench_function("plan_self_transition", |b| {
        b.iter(|| hierarchy.plan(black_box(leaf), black_box(leaf)).unwrap())
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let states = chain();
    let hierarchy = Hierarchy::new(&states).unwrap();
    let queue: EventQueue<32> = EventQueue::new();
    let leaf = StateId::new(MAX_DEPTH as u8 - 1);
    let mut actions = 0u32;
    let mut sm = StateMachine::new(hierarchy, StateId::new(0), &queue).unwrap();

    c.bench_function("dispatch_deep_round_trip", |b| {
        b.iter(|| {
            sm.send_event(Event::user(leaf.raw() as u16)).unwrap();
            sm.send_event(Event::user(0)).unwrap();
            black_box(sm.process(&mut actions).unwrap())
        })
    });
}

criterion_group!(benches, bench_plan, bench_dispatch);
criterion_main!(benches);
