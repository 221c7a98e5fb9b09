use crate::Dispatch::{Dispatcher, ShutdownHandle, WorkerSlot};
use crate::SPSC::Buffer::RingBuffer;
use crate::SPSC::{Consumer, Producer};
use std::fmt;
use std::sync::atomic::Ordering;

/// Debug function for RingBuffer
///
/// Shows capacity and a relaxed snapshot of both cursors; never touches the
/// slots, which may be uninitialized.
pub fn debug_ring_buffer<T>(buffer: &RingBuffer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingBuffer")
        .field("capacity", &buffer.capacity)
        .field("push", &buffer.cursors.push.load(Ordering::Relaxed))
        .field("pop", &buffer.cursors.pop.load(Ordering::Relaxed))
        .field("len", &buffer.len())
        .finish_non_exhaustive()
}

/// Debug function for Producer
pub fn debug_producer<T>(producer: &Producer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Producer")
        .field("cached_pop", &producer.cached_pop)
        .field("ring", &*producer.ring)
        .finish()
}

/// Debug function for Consumer
pub fn debug_consumer<T>(consumer: &Consumer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Consumer")
        .field("cached_push", &consumer.cached_push)
        .field("ring", &*consumer.ring)
        .finish()
}

/// Debug function for Dispatcher
///
/// Takes the barrier lock once to read the cycle counter and slot states.
pub fn debug_dispatcher(dispatcher: &Dispatcher, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (states, cycles_run) = {
        let st = dispatcher.barrier.state.lock();
        (st.slots.clone(), st.cycle)
    };

    f.debug_struct("Dispatcher")
        .field("workers", &dispatcher.workers())
        .field("states", &states)
        .field("cycles_run", &cycles_run)
        .field("shut_down", &dispatcher.is_shut_down())
        .finish()
}

/// Debug function for WorkerSlot
pub fn debug_worker_slot(slot: &WorkerSlot, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WorkerSlot")
        .field("id", &slot.id())
        .field("thread", &slot.thread_name())
        .field("core", &slot.core())
        .finish_non_exhaustive()
}

/// Debug function for ShutdownHandle
pub fn debug_shutdown_handle(handle: &ShutdownHandle, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ShutdownHandle")
        .field("triggered", &handle.is_triggered())
        .finish()
}
