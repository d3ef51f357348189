//! Blinky lamp controller on the host
//!
//! Demonstrates nested states, deferred initial transitions and
//! interrupt-style event submission:
//!
//! ```text
//! top
//! ├── operational   (initial: off)
//! │   ├── off
//! │   └── on
//! └── fault
//! ```
//!
//! A producer thread stands in for the timer interrupt and posts events into
//! a static queue while the main loop polls `process`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use hsm_engine::{
    Event, EventQueue, Hierarchy, HsmError, HsmResult, StateDescriptor, StateHandler, StateId,
    StateMachine,
};

hsm_core::state_ids! {
    TOP,
    OPERATIONAL,
    OFF,
    ON,
    FAULT,
}

hsm_core::define_events! {
    TICK = 0,
    FAULT_DETECTED = 1,
    RESET = 2,
}

/// Number of timer interrupts simulated
const TICKS: u32 = 24;

/// Lamp states
enum Lamp {
    Top,
    Operational,
    Off,
    On,
    Fault,
}

/// Hardware stand-in shared by all handlers
#[derive(Default)]
struct Board {
    lit: bool,
    blinks: u32,
    faults: u32,
}

impl StateHandler for Lamp {
    type Context = Board;

    fn handle(&self, sm: &mut StateMachine<'_, Self>, board: &mut Board, event: Event) -> HsmResult<()> {
        match self {
            Lamp::Top => match event {
                Event::INITIAL => sm.set_state(board, OPERATIONAL),
                _ => Ok(()),
            },
            Lamp::Operational => match event {
                Event::INITIAL => sm.set_state(board, OFF),
                Event::ON_ENTRY => {
                    println!("  operational");
                    Ok(())
                }
                Event::ON_EXIT => {
                    board.lit = false;
                    Ok(())
                }
                _ => Ok(()),
            },
            Lamp::Off => match event {
                Event::ON_ENTRY => {
                    board.lit = false;
                    Ok(())
                }
                TICK => sm.set_state(board, ON),
                FAULT_DETECTED => sm.set_state(board, FAULT),
                _ => Ok(()),
            },
            Lamp::On => match event {
                Event::ON_ENTRY => {
                    board.lit = true;
                    board.blinks += 1;
                    Ok(())
                }
                TICK => sm.set_state(board, OFF),
                FAULT_DETECTED => sm.set_state(board, FAULT),
                _ => Ok(()),
            },
            Lamp::Fault => match event {
                Event::ON_ENTRY => {
                    board.faults += 1;
                    println!("  fault, lamp forced off");
                    Ok(())
                }
                RESET => sm.set_state(board, OPERATIONAL),
                _ => Ok(()),
            },
        }
    }
}

static STATES: [StateDescriptor<Lamp>; 5] = [
    StateDescriptor::root(Lamp::Top),
    StateDescriptor::child(Lamp::Operational, TOP),
    StateDescriptor::child(Lamp::Off, OPERATIONAL),
    StateDescriptor::child(Lamp::On, OPERATIONAL),
    StateDescriptor::child(Lamp::Fault, TOP),
];

static QUEUE: EventQueue<16> = EventQueue::new();

static RUNNING: AtomicBool = AtomicBool::new(true);

fn state_name(state: StateId) -> &'static str {
    match state {
        TOP => "top",
        OPERATIONAL => "operational",
        OFF => "off",
        ON => "on",
        FAULT => "fault",
        _ => "?",
    }
}

fn main() -> Result<(), HsmError> {
    println!("\n╔════════════════════════════════════════╗");
    println!("║  HSM Engine - Blinky                   ║");
    println!("║  Running on the host                   ║");
    println!("╚════════════════════════════════════════╝\n");

    let hierarchy = Hierarchy::new(&STATES)?;
    let mut board = Board::default();
    let mut lamp = StateMachine::new(hierarchy, TOP, &QUEUE)?;

    lamp.init(&mut board)?;
    lamp.process(&mut board)?;
    println!("initialized in {}", state_name(lamp.current_state()));

    // Timer "interrupt"
    let ticker = thread::spawn(|| {
        for tick in 1..=TICKS {
            thread::sleep(Duration::from_millis(20));
            let event = match tick {
                12 => FAULT_DETECTED,
                16 => RESET,
                _ => TICK,
            };
            if QUEUE.enqueue(event).is_err() {
                eprintln!("[{}] queue full, {} dropped", tick, event);
            }
        }
        RUNNING.store(false, Ordering::Release);
    });

    let mut cycle = 0u32;
    while RUNNING.load(Ordering::Acquire) || !QUEUE.is_empty() {
        let before = lamp.current_state();
        let dispatched = lamp.process(&mut board)?;
        if dispatched > 0 {
            cycle += 1;
            println!(
                "[{}] {} -> {} (lamp {}, {} events)",
                cycle,
                state_name(before),
                state_name(lamp.current_state()),
                if board.lit { "ON" } else { "off" },
                dispatched
            );
        }
        thread::sleep(Duration::from_millis(5));
    }

    if ticker.join().is_err() {
        eprintln!("ticker thread panicked");
    }

    let stats = QUEUE.stats();
    println!("\n╔════════ Summary ════════╗");
    println!("║ Blinks:    {:4}", board.blinks);
    println!("║ Faults:    {:4}", board.faults);
    println!("║ Peak queue {:4} / {}", stats.max_used, stats.capacity);
    println!("║ Dropped:   {:4}", stats.dropped);
    println!("╚═════════════════════════╝\n");

    Ok(())
}
