use crossbeam_utils::CachePadded;
use std::sync::atomic::AtomicUsize;

/// The cursor pair shared by the two ends of a ring buffer.
///
/// Each cursor is written by exactly one thread and read by the other; the
/// two are padded onto separate cache lines. The cached copies of the peer cursor are not stored here; they live in
/// the `Producer`/`Consumer` handles and never leave their thread.
#[repr(C)]
pub struct CursorBlock {
    /// Loaded and stored by the producer; loaded by the consumer.
    pub push: CachePadded<AtomicUsize>,

    /// Loaded and stored by the consumer; loaded by the producer.
    pub pop: CachePadded<AtomicUsize>,
}

impl CursorBlock {
    pub fn new() -> Self {
        Self {
            push: CachePadded::new(AtomicUsize::new(0)),
            pop: CachePadded::new(AtomicUsize::new(0)),
        }
    }
}

impl Default for CursorBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoffset::offset_of;
    use std::mem::{align_of, size_of};

    #[test]
    fn cursors_sit_on_separate_cache_lines() {
        let line = align_of::<CachePadded<AtomicUsize>>();
        let off_push = offset_of!(CursorBlock, push);
        let off_pop = offset_of!(CursorBlock, pop);

        println!(
            "CursorBlock => size: {}, line: {line}, offsets: [push:{off_push}, pop:{off_pop}]",
            size_of::<CursorBlock>()
        );

        assert!(line >= 64);
        assert_eq!(off_push, 0);
        assert!(off_pop - off_push >= line);
        assert_eq!(off_pop % line, 0);
    }
}
