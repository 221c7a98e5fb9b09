use super::{Consumer, Producer};
use crate::Core::Result;
use crate::SPSC::Buffer::RingBuffer;
use std::sync::Arc;

pub struct ChannelBuilder {
    capacity: usize,
}

impl Default for ChannelBuilder {
    fn default() -> Self {
        Self {
            capacity: 1024, // 1024 slots
        }
    }
}

impl ChannelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Allocate the ring and split it into its two ends.
    pub fn build<T>(self) -> Result<(Producer<T>, Consumer<T>)> {
        let ring = Arc::new(RingBuffer::new(self.capacity)?);
        Ok((Producer::new(Arc::clone(&ring)), Consumer::new(ring)))
    }
}

/// Shorthand for `ChannelBuilder::new().with_capacity(capacity).build()`.
pub fn ring_buffer<T>(capacity: usize) -> Result<(Producer<T>, Consumer<T>)> {
    ChannelBuilder::new().with_capacity(capacity).build()
}
