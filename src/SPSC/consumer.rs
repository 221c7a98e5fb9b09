// src/SPSC/consumer.rs

use crate::SPSC::Buffer::RingBuffer;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use std::sync::Arc;

/// The reading end of a ring buffer.
///
/// There is exactly one `Consumer` per buffer and it is not `Clone`.
pub struct Consumer<T> {
    pub(crate) ring: Arc<RingBuffer<T>>,
    /// Last observed push cursor. Only refreshed when the ring looks empty.
    pub(crate) cached_push: usize,
}

impl<T> Consumer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        Self {
            ring,
            cached_push: 0,
        }
    }

    /// Pop the oldest value.
    ///
    /// # Returns
    /// * `Some(value)` if an element was available
    /// * `None` if the ring is empty; nothing was modified
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let ring = &*self.ring;
        let pop = ring.cursors.pop.load(Relaxed);

        if self.cached_push == pop {
            self.cached_push = ring.cursors.push.load(Acquire);
            if self.cached_push == pop {
                return None;
            }
        }

        // The acquire load of `push` made the producer's write visible.
        let value = unsafe { ring.read_slot(pop) };

        // Hand the slot back: pairs with the producer's acquire load of `pop`.
        ring.cursors.pop.store(ring.advance(pop), Release);
        Some(value)
    }

    /// Returns the number of slots in the ring
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Number of queued elements, see [`RingBuffer::len`].
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}
