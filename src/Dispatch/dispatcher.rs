use super::barrier::{worker_loop, Barrier};
use super::builder::DispatcherBuilder;
use super::slot::{SlotState, WorkerSlot};
use super::work_unit::{SlotId, WorkUnit};
use crate::Core::affinity;
use crate::Core::{Error, Result};
use parking_lot::Condvar;
use std::collections::BTreeSet;
use std::mem;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, trace, warn};

/// Outcome of one `run_cycle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleResult {
    /// Generation of this cycle, starting at 1.
    pub cycle: u64,
    /// Slots whose unit returned an error or panicked this cycle.
    pub failed_slots: BTreeSet<SlotId>,
    /// Shutdown cut the cycle short; some units did not run.
    pub interrupted: bool,
}

impl CycleResult {
    pub fn is_success(&self) -> bool {
        self.failed_slots.is_empty() && !self.interrupted
    }
}

/// Re-armable barrier over a fixed set of worker threads.
///
/// ### Concurrency Design:
/// - **Arming**: `run_cycle` flips every slot `Idle -> Armed` and sets the
///   outstanding count under the barrier mutex, then notifies each worker's
///   own condvar.
/// - **Completion**: each worker runs its unit outside the lock, then takes
///   the lock to go back to `Idle`, decrement the count and, if it was the
///   last, wake the coordinator.
/// - **Ordering**: every transition happens under one mutex, so the return
///   of cycle k happens-after every unit of cycle k, and every unit of cycle
///   k+1 happens-after that return.
///
/// There is no per-cycle timeout: a unit that never returns stalls
/// `run_cycle` until it does.
pub struct Dispatcher {
    pub(crate) barrier: Arc<Barrier>,
    slots: Vec<WorkerSlot>,
    config: DispatcherBuilder,
    /// Set by the first `run_cycle`; registration is closed afterwards.
    started: bool,
    /// Set once `shutdown` joined every thread.
    joined: bool,
}

/// Cloneable handle that requests shutdown from any thread.
///
/// Triggering only raises the flag and wakes everyone: parked workers exit,
/// a blocked `run_cycle` returns an interrupted result. Joining the threads
/// is left to `Dispatcher::shutdown` (or drop) on the owning thread.
#[derive(Clone)]
pub struct ShutdownHandle {
    barrier: Arc<Barrier>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        if self.barrier.request_shutdown() {
            info!("dispatcher shutdown requested");
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.barrier.state.lock().shutdown
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatcherBuilder::default())
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub(crate) fn with_config(config: DispatcherBuilder) -> Self {
        Self {
            barrier: Arc::new(Barrier::new()),
            slots: Vec::new(),
            config,
            started: false,
            joined: false,
        }
    }

    /// Bind `unit` to a new slot and spawn its worker thread, parked idle.
    ///
    /// # Panics
    /// If called after the first `run_cycle` or after `shutdown`.
    pub fn register_worker<U: WorkUnit + 'static>(&mut self, unit: U) -> Result<SlotId> {
        self.register_boxed(Box::new(unit))
    }

    /// Same as [`register_worker`](Self::register_worker) for an already
    /// boxed unit.
    pub fn register_boxed(&mut self, unit: Box<dyn WorkUnit>) -> Result<SlotId> {
        assert!(
            !self.started,
            "register_worker called after cycles started; the worker set is fixed"
        );
        assert!(!self.joined, "register_worker called after shutdown");

        let id = SlotId(self.slots.len());
        let wake = Arc::new(Condvar::new());
        {
            let mut st = self.barrier.state.lock();
            st.slots.push(SlotState::Idle);
            st.wakers.push(Arc::clone(&wake));
        }

        let thread_name = format!("{}-{}", self.config.thread_name, id);
        let core = self
            .config
            .pin_cores
            .then(|| id.index() % affinity::available_cores());

        let mut builder = thread::Builder::new().name(thread_name.clone());
        if let Some(bytes) = self.config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let barrier = Arc::clone(&self.barrier);
        let spawned = builder.spawn(move || {
            if let Some(core) = core {
                if let Err(e) = affinity::pin_current_thread(core) {
                    warn!(slot = %id, core, error = %e, "failed to pin worker");
                }
            }
            worker_loop(barrier, id, wake, unit)
        });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(source) => {
                let mut st = self.barrier.state.lock();
                st.slots.pop();
                st.wakers.pop();
                return Err(Error::Spawn {
                    name: thread_name,
                    source,
                });
            }
        };

        debug!(slot = %id, thread = %thread_name, ?core, "worker registered");
        self.slots.push(WorkerSlot {
            id,
            thread_name,
            core,
            thread: Some(handle),
        });
        Ok(id)
    }

    /// Run every registered unit exactly once and block until all finished.
    ///
    /// A unit that fails is reported in `failed_slots`; it never keeps the
    /// barrier from releasing. If shutdown is requested through a
    /// [`ShutdownHandle`] the call returns early with `interrupted` set.
    ///
    /// # Panics
    /// If called after `shutdown`, or if a slot is not idle at arm time.
    pub fn run_cycle(&mut self) -> CycleResult {
        assert!(!self.joined, "run_cycle called after shutdown");
        self.started = true;

        let mut st = self.barrier.state.lock();
        if st.shutdown {
            return CycleResult {
                cycle: st.cycle,
                failed_slots: BTreeSet::new(),
                interrupted: true,
            };
        }

        st.cycle += 1;
        let cycle = st.cycle;
        for (index, state) in st.slots.iter_mut().enumerate() {
            assert_eq!(
                *state,
                SlotState::Idle,
                "slot {index} armed while not idle"
            );
            *state = SlotState::Armed;
        }
        st.outstanding = st.slots.len();
        st.failed.clear();
        st.interrupted = false;
        for wake in &st.wakers {
            wake.notify_one();
        }
        trace!(cycle, workers = st.outstanding, "cycle armed");

        while st.outstanding > 0 && !st.shutdown {
            self.barrier.done.wait(&mut st);
        }

        let result = CycleResult {
            cycle,
            failed_slots: mem::take(&mut st.failed),
            interrupted: st.interrupted || st.outstanding > 0,
        };
        if result.failed_slots.is_empty() {
            trace!(cycle, "cycle complete");
        } else {
            debug!(cycle, failed = ?result.failed_slots, "cycle completed with failures");
        }
        result
    }

    /// Stop and join every worker. Idempotent.
    ///
    /// Parked workers observe the flag before they could pick up another
    /// unit; a unit already running is allowed to finish.
    pub fn shutdown(&mut self) {
        if self.joined {
            return;
        }
        self.shutdown_handle().trigger();

        for slot in &mut self.slots {
            if let Some(handle) = slot.thread.take() {
                if handle.join().is_err() {
                    warn!(slot = %slot.id, "worker thread panicked outside its unit");
                }
            }
        }
        self.joined = true;
        info!(workers = self.slots.len(), "dispatcher shut down");
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            barrier: Arc::clone(&self.barrier),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.slots.len()
    }

    pub fn workers(&self) -> &[WorkerSlot] {
        &self.slots
    }

    /// Current state of `slot`, or `None` for an unknown id.
    pub fn slot_state(&self, slot: SlotId) -> Option<SlotState> {
        self.barrier.state.lock().slots.get(slot.index()).copied()
    }

    /// Number of cycles armed so far.
    pub fn cycles_run(&self) -> u64 {
        self.barrier.state.lock().cycle
    }

    pub fn is_shut_down(&self) -> bool {
        self.joined
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
