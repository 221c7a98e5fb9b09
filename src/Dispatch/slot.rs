use super::work_unit::SlotId;
use std::thread::JoinHandle;

/// Lifecycle of one worker within the barrier.
///
/// `Idle -> Armed -> Running -> Idle` once per cycle; `Exited` is terminal
/// and only entered from `Idle` or `Armed` after the worker saw shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Idle,
    Armed,
    Running,
    Exited,
}

/// Coordinator-side record of one worker.
///
/// The slot's state flag and wake condvar live in the barrier state next to
/// every other slot's, guarded by the barrier mutex; the work unit itself was
/// moved onto the worker thread.
pub struct WorkerSlot {
    pub(crate) id: SlotId,
    pub(crate) thread_name: String,
    pub(crate) core: Option<usize>,
    pub(crate) thread: Option<JoinHandle<()>>,
}

impl WorkerSlot {
    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// Core the worker was pinned to, if pinning was requested.
    pub fn core(&self) -> Option<usize> {
        self.core
    }
}
