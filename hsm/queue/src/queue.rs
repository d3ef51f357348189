//! Interrupt-safe circular event queue

use core::cell::RefCell;
use critical_section::Mutex;

use crate::{Event, HsmError, HsmResult, QueueStats};

/// Producer/consumer seam between a state machine and its queue.
///
/// Object safe so a machine can bind to a queue of any capacity.
pub trait EventPort {
    /// Insert an event at the back of the queue
    ///
    /// Returns `Err(HsmError::QueueFull)` if the event was dropped.
    fn post(&self, event: Event) -> HsmResult<()>;

    /// Remove the event at the front of the queue
    ///
    /// Returns `Err(HsmError::QueueEmpty)` if nothing is queued.
    fn fetch(&self) -> HsmResult<Event>;
}

/// Ring buffer state, only touched inside a critical section
struct Ring<const N: usize> {
    buffer: [Event; N],
    head: u8,
    tail: u8,
    // head == tail is either full or empty, the flags disambiguate
    full: bool,
    empty: bool,
    max_used: u8,
    dropped: u32,
}

impl<const N: usize> Ring<N> {
    const fn new() -> Self {
        Self {
            buffer: [Event::INITIAL; N],
            head: 0,
            tail: 0,
            full: false,
            empty: true,
            max_used: 0,
            dropped: 0,
        }
    }

    fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.full = false;
        self.empty = true;
    }

    const fn advance(index: u8) -> u8 {
        if (index as usize) < N - 1 {
            index + 1
        } else {
            0
        }
    }

    fn len(&self) -> usize {
        if self.full {
            N
        } else if self.head >= self.tail {
            (self.head - self.tail) as usize
        } else {
            N - (self.tail - self.head) as usize
        }
    }

    fn put(&mut self, event: Event) -> HsmResult<()> {
        if self.full {
            self.dropped = self.dropped.saturating_add(1);
            return Err(HsmError::QueueFull);
        }

        self.buffer[self.head as usize] = event;
        self.empty = false;
        self.head = Self::advance(self.head);
        self.full = self.head == self.tail;

        let used = self.len() as u8;
        if used > self.max_used {
            self.max_used = used;
        }
        Ok(())
    }

    fn get(&mut self) -> HsmResult<Event> {
        if self.empty {
            return Err(HsmError::QueueEmpty);
        }

        let event = self.buffer[self.tail as usize];
        self.full = false;
        self.tail = Self::advance(self.tail);
        self.empty = self.tail == self.head;
        Ok(event)
    }
}

/// Fixed-capacity FIFO of events
///
/// Capacity `N` must be in `1..=255`; other values fail to compile. It
/// defaults to [`DEFAULT_QUEUE_CAPACITY`](crate::DEFAULT_QUEUE_CAPACITY).
/// Can live in a `static` so interrupt handlers reach it directly:
///
/// ```
/// use hsm_queue::{Event, EventQueue};
///
/// static QUEUE: EventQueue<4> = EventQueue::new();
///
/// QUEUE.enqueue(Event::user(0)).unwrap();
/// assert_eq!(QUEUE.dequeue(), Ok(Event::user(0)));
/// ```
pub struct EventQueue<const N: usize = { crate::DEFAULT_QUEUE_CAPACITY }> {
    ring: Mutex<RefCell<Ring<N>>>,
}

impl<const N: usize> EventQueue<N> {
    const CAPACITY_OK: () = assert!(
        N > 0 && N <= crate::MAX_QUEUE_CAPACITY,
        "event queue capacity must be in 1..=255"
    );

    /// Create a new empty event queue
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;
        Self {
            ring: Mutex::new(RefCell::new(Ring::new())),
        }
    }

    /// Discard all queued events
    ///
    /// Statistics (high-water mark, drop counter) are kept.
    pub fn reset(&self) {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).reset());
    }

    /// Insert an event at the back of the queue
    ///
    /// Safe to call from interrupt context. When the queue is full the event
    /// is dropped, counted, and `Err(HsmError::QueueFull)` is returned; the
    /// queued contents are left untouched.
    pub fn enqueue(&self, event: Event) -> HsmResult<()> {
        let result = critical_section::with(|cs| self.ring.borrow_ref_mut(cs).put(event));

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::warn!("event queue full, dropped {}", event);
        }

        result
    }

    /// Remove the event at the front of the queue
    ///
    /// # Preconditions
    ///
    /// Single consumer: only the owning machine's dispatch loop dequeues.
    pub fn dequeue(&self) -> HsmResult<Event> {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).get())
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.ring.borrow_ref(cs).empty)
    }

    /// Check if the queue is full
    pub fn is_full(&self) -> bool {
        critical_section::with(|cs| self.ring.borrow_ref(cs).full)
    }

    /// Get the number of events in the queue
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.ring.borrow_ref(cs).len())
    }

    /// Get the maximum capacity of the queue
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Usage snapshot
    pub fn stats(&self) -> QueueStats {
        critical_section::with(|cs| {
            let ring = self.ring.borrow_ref(cs);
            QueueStats {
                capacity: N,
                used: ring.len(),
                max_used: ring.max_used as usize,
                dropped: ring.dropped,
            }
        })
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventPort for EventQueue<N> {
    fn post(&self, event: Event) -> HsmResult<()> {
        self.enqueue(event)
    }

    fn fetch(&self) -> HsmResult<Event> {
        self.dequeue()
    }
}
