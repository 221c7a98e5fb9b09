use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::Ordering::{Acquire, Relaxed};

use super::layout::CursorBlock;
use super::Buffer::RingBuffer;
use crate::Core::{Error, Result};

impl<T> RingBuffer<T> {
    /// Largest capacity whose cursor period still fits in a `usize`.
    pub const MAX_CAPACITY: usize = usize::MAX / 2;

    /// Allocate storage for `capacity` elements. No element is initialized.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || capacity > Self::MAX_CAPACITY {
            return Err(Error::InvalidCapacity {
                requested: capacity,
                max: Self::MAX_CAPACITY,
            });
        }

        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            cursors: CursorBlock::new(),
            slots,
            capacity,
            wrap: capacity * 2,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of queued elements.
    ///
    /// Best effort: the two cursors are read one after the other, so under
    /// concurrent use the answer may already be stale. It is clamped to
    /// `0..=capacity`.
    #[inline]
    pub fn len(&self) -> usize {
        let pop = self.cursors.pop.load(Acquire);
        let push = self.cursors.push.load(Relaxed);
        self.distance(push, pop).min(self.capacity)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Elements between `pop` and `push`, modulo the cursor period.
    #[inline]
    pub(crate) fn distance(&self, push: usize, pop: usize) -> usize {
        if push >= pop {
            push - pop
        } else {
            push + self.wrap - pop
        }
    }

    /// The cursor that follows `cursor`.
    #[inline]
    pub(crate) fn advance(&self, cursor: usize) -> usize {
        let next = cursor + 1;
        if next == self.wrap {
            0
        } else {
            next
        }
    }

    #[inline]
    fn slot(&self, cursor: usize) -> *mut MaybeUninit<T> {
        let index = if cursor >= self.capacity {
            cursor - self.capacity
        } else {
            cursor
        };
        self.slots[index].get()
    }

    /// Move `value` into the slot addressed by `cursor`.
    ///
    /// # Safety
    /// Only the producer may call this, and only for a cursor outside
    /// `[pop, push)`.
    #[inline]
    pub(crate) unsafe fn write_slot(&self, cursor: usize, value: T) {
        (*self.slot(cursor)).write(value);
    }

    /// Move the value out of the slot addressed by `cursor`, leaving it
    /// uninitialized.
    ///
    /// # Safety
    /// Only the consumer may call this, and only for a cursor inside
    /// `[pop, push)`.
    #[inline]
    pub(crate) unsafe fn read_slot(&self, cursor: usize) -> T {
        (*self.slot(cursor)).assume_init_read()
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // Both handles are gone, so the cursors are final.
        let push = *self.cursors.push.get_mut();
        let mut pop = *self.cursors.pop.get_mut();

        while pop != push {
            // Slots in [pop, push) are initialized.
            unsafe { (*self.slot(pop)).assume_init_drop() };
            pop = self.advance(pop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_period_is_twice_capacity() {
        let rb = RingBuffer::<u8>::new(3).unwrap();
        let mut cursor = 0;
        for _ in 0..6 {
            cursor = rb.advance(cursor);
        }
        assert_eq!(cursor, 0);
    }

    #[test]
    fn distance_handles_wrapped_push_cursor() {
        let rb = RingBuffer::<u8>::new(4).unwrap();
        // pop sits at 6, push wrapped past 7 back to 1: elements 6, 7, 0
        assert_eq!(rb.distance(1, 6), 3);
        assert_eq!(rb.distance(2, 6), 4);
        assert_eq!(rb.distance(6, 6), 0);
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(matches!(
            RingBuffer::<u8>::new(0),
            Err(Error::InvalidCapacity { requested: 0, .. })
        ));
    }
}
