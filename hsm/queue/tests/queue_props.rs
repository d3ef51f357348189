//! Property-based tests for the event queue.
//!
//! A `VecDeque` bounded to the same capacity serves as the model.

use std::collections::VecDeque;

use hsm_queue::{Event, EventQueue, HsmError};
use proptest::prelude::*;

const CAPACITY: usize = 5;

#[derive(Debug, Clone)]
enum Op {
    Enqueue(u16),
    Dequeue,
}

prop_compose! {
    fn arbitrary_op()(is_put in any::<bool>(), code in 0..1000u16) -> Op {
        if is_put { Op::Enqueue(code) } else { Op::Dequeue }
    }
}

proptest! {
    #[test]
    fn queue_matches_bounded_fifo_model(ops in prop::collection::vec(arbitrary_op(), 0..200)) {
        let queue: EventQueue<CAPACITY> = EventQueue::new();
        let mut model: VecDeque<Event> = VecDeque::new();

        for op in ops {
            match op {
                Op::Enqueue(code) => {
                    let event = Event::user(code);
                    let result = queue.enqueue(event);
                    if model.len() == CAPACITY {
                        prop_assert_eq!(result, Err(HsmError::QueueFull));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        model.push_back(event);
                    }
                }
                Op::Dequeue => {
                    let expected = model.pop_front().ok_or(HsmError::QueueEmpty);
                    prop_assert_eq!(queue.dequeue(), expected);
                }
            }
            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.is_full(), model.len() == CAPACITY);
            prop_assert_eq!(queue.is_empty(), model.is_empty());
        }
    }

    #[test]
    fn dequeue_order_equals_enqueue_order(codes in prop::collection::vec(0..500u16, 0..=CAPACITY)) {
        let queue: EventQueue<CAPACITY> = EventQueue::new();
        for &code in &codes {
            prop_assert!(queue.enqueue(Event::user(code)).is_ok());
        }
        for &code in &codes {
            prop_assert_eq!(queue.dequeue(), Ok(Event::user(code)));
        }
        prop_assert_eq!(queue.dequeue(), Err(HsmError::QueueEmpty));
    }
}
