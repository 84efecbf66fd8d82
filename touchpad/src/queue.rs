//! Interrupt to task hand-off for touch events
//!
//! The callback given to [`PadController::initialize`](crate::PadController::initialize) runs in
//! interrupt context and must not block. [`EventProducer::push`] is meant to be its whole body:
//! it either enqueues the event or counts it as dropped, and never waits.
//!
//! ```ignore
//! static mut EVENTS: EventQueue<16> = EventQueue::new();
//! let (producer, mut consumer) = unsafe { EVENTS.split() };
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use heapless::spsc::{Consumer, Producer, Queue};

use crate::TouchEvent;

/// Bounded single producer, single consumer queue of touch events
///
/// Holds at most `N - 1` events.
pub struct EventQueue<const N: usize> {
    queue: Queue<TouchEvent, N>,
    dropped: AtomicU32,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Split into the interrupt side and the task side
    pub fn split(&mut self) -> (EventProducer<'_, N>, EventConsumer<'_, N>) {
        let (producer, consumer) = self.queue.split();
        (
            EventProducer {
                inner: producer,
                dropped: &self.dropped,
            },
            EventConsumer {
                inner: consumer,
                dropped: &self.dropped,
            },
        )
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventProducer<'a, const N: usize> {
    inner: Producer<'a, TouchEvent, N>,
    dropped: &'a AtomicU32,
}

impl<'a, const N: usize> EventProducer<'a, N> {
    /// Enqueue an event without blocking
    ///
    /// When the queue is full the event is returned and the overflow counter incremented.
    pub fn push(&mut self, event: TouchEvent) -> Result<(), TouchEvent> {
        self.inner.enqueue(event).map_err(|event| {
            // Only the producer writes the counter
            let dropped = self.dropped.load(Ordering::Relaxed);
            self.dropped.store(dropped.wrapping_add(1), Ordering::Relaxed);

            #[cfg(feature = "defmt")]
            defmt::warn!("touch event queue full, dropped {}", event);

            event
        })
    }

    pub fn ready(&self) -> bool {
        self.inner.ready()
    }
}

pub struct EventConsumer<'a, const N: usize> {
    inner: Consumer<'a, TouchEvent, N>,
    dropped: &'a AtomicU32,
}

impl<'a, const N: usize> EventConsumer<'a, N> {
    pub fn pop(&mut self) -> Option<TouchEvent> {
        self.inner.dequeue()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.inner.ready()
    }

    /// Number of events lost because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<'a, const N: usize> Iterator for EventConsumer<'a, N> {
    type Item = TouchEvent;

    fn next(&mut self) -> Option<TouchEvent> {
        self.pop()
    }
}
