// Storage and cursors of the single-producer single-consumer ring buffer

use super::layout::CursorBlock;

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;

/// A bounded, lock-free ring buffer for exactly one producer thread and one
/// consumer thread.
///
/// This struct is never handed out directly. `ChannelBuilder::build` wraps it
/// in an `Arc` shared by one `Producer` and one `Consumer`, which is how the
/// one-writer-per-cursor rule is enforced.
///
/// ### Cursor encoding:
/// Cursors advance modulo `2 * capacity` instead of modulo the machine word.
/// - `push - pop` (taken modulo `2 * capacity`) is the number of queued
///   elements, so "empty" (0) and "full" (`capacity`) never alias.
/// - The storage index of a cursor is `cursor mod capacity`, which stays
///   consistent across the wrap for every capacity, not just powers of two.
pub struct RingBuffer<T> {
    /// Push and pop cursors, each on its own cache line.
    pub(crate) cursors: CursorBlock,

    /// `capacity` slots; the ones in `[pop, push)` are initialized.
    pub(crate) slots: Box<[UnsafeCell<MaybeUninit<T>>]>,

    /// Number of slots.
    pub(crate) capacity: usize,

    /// Period of the cursors, `2 * capacity`.
    pub(crate) wrap: usize,
}

// Slots in [pop, push) are only read by the consumer, the rest only written
// by the producer; the cursor protocol hands each slot across with
// release/acquire pairs.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}
