// In src/SPSC/producer.rs
use crate::SPSC::Buffer::RingBuffer;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use std::sync::Arc;

/// The writing end of a ring buffer.
///
/// There is exactly one `Producer` per buffer and it is not `Clone`; moving
/// it to a thread makes that thread the producer.
pub struct Producer<T> {
    pub(crate) ring: Arc<RingBuffer<T>>,
    /// Last observed pop cursor. Only refreshed when the ring looks full.
    pub(crate) cached_pop: usize,
}

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        Self {
            ring,
            cached_pop: 0,
        }
    }

    /// Push one value.
    ///
    /// # Returns
    /// * `Ok(())` if the value was published to the consumer
    /// * `Err(value)` if the ring is full; nothing was modified and the
    ///   value is handed back. Retrying or dropping it is up to the caller.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), T> {
        let ring = &*self.ring;
        let push = ring.cursors.push.load(Relaxed);

        if ring.distance(push, self.cached_pop) == ring.capacity {
            self.cached_pop = ring.cursors.pop.load(Acquire);
            if ring.distance(push, self.cached_pop) == ring.capacity {
                return Err(value);
            }
        }

        // The acquire above (or an earlier one) ordered the consumer's read
        // of this slot before our write.
        unsafe { ring.write_slot(push, value) };

        // Publish: pairs with the consumer's acquire load of `push`.
        ring.cursors.push.store(ring.advance(push), Release);
        Ok(())
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
