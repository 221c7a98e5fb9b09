// Condition-variable barrier shared by the coordinator and its workers

use super::slot::SlotState;
use super::work_unit::{SlotId, WorkUnit};
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Everything the coordinator and the workers agree on. Only ever touched
/// with `Barrier::state` locked.
pub(crate) struct BarrierState {
    /// One entry per registered worker, indexed by `SlotId`.
    pub(crate) slots: Vec<SlotState>,
    /// Per-worker wake condvars, same indexing as `slots`.
    pub(crate) wakers: Vec<Arc<Condvar>>,
    /// Workers armed for the current cycle that have not reported back.
    pub(crate) outstanding: usize,
    /// Slots whose unit failed during the current cycle.
    pub(crate) failed: BTreeSet<SlotId>,
    /// Set when an armed worker left on shutdown without executing.
    pub(crate) interrupted: bool,
    /// Generation of the most recently armed cycle; 0 before the first.
    pub(crate) cycle: u64,
    /// Write-once: false until shutdown is requested.
    pub(crate) shutdown: bool,
}

pub(crate) struct Barrier {
    pub(crate) state: Mutex<BarrierState>,
    /// The coordinator waits here for `outstanding == 0`.
    pub(crate) done: Condvar,
}

impl Barrier {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(BarrierState {
                slots: Vec::new(),
                wakers: Vec::new(),
                outstanding: 0,
                failed: BTreeSet::new(),
                interrupted: false,
                cycle: 0,
                shutdown: false,
            }),
            done: Condvar::new(),
        }
    }

    /// Raise the shutdown flag and wake every parked thread.
    ///
    /// Returns `false` if shutdown had already been requested.
    pub(crate) fn request_shutdown(&self) -> bool {
        let mut st = self.state.lock();
        let first = !st.shutdown;
        st.shutdown = true;
        for wake in &st.wakers {
            wake.notify_one();
        }
        self.done.notify_all();
        first
    }
}

/// Body of every worker thread.
///
/// Parks until its slot is armed, runs the unit outside the lock, reports
/// back under the lock. The shutdown flag is checked under the same lock
/// right after every wake, so a parked worker can never start another unit
/// once shutdown was requested.
pub(crate) fn worker_loop(
    barrier: Arc<Barrier>,
    slot: SlotId,
    wake: Arc<Condvar>,
    mut unit: Box<dyn WorkUnit>,
) {
    let index = slot.index();
    debug!(slot = %slot, "worker started");

    loop {
        let cycle = {
            let mut st = barrier.state.lock();
            // Re-check after every wake; spurious wakeups fall through here
            while st.slots[index] != SlotState::Armed && !st.shutdown {
                wake.wait(&mut st);
            }

            if st.shutdown {
                if st.slots[index] == SlotState::Armed {
                    // Still owed to the coordinator for this cycle
                    st.interrupted = true;
                    st.outstanding -= 1;
                    if st.outstanding == 0 {
                        barrier.done.notify_one();
                    }
                }
                st.slots[index] = SlotState::Exited;
                debug!(slot = %slot, cycle = st.cycle, "worker observed shutdown, exiting");
                return;
            }

            st.slots[index] = SlotState::Running;
            st.cycle
        };

        trace!(slot = %slot, cycle, "executing work unit");
        let failure = match panic::catch_unwind(AssertUnwindSafe(|| unit.execute(slot))) {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
        };
        if let Some(reason) = &failure {
            warn!(slot = %slot, cycle, reason = %reason, "work unit failed");
        }

        let mut st = barrier.state.lock();
        st.slots[index] = SlotState::Idle;
        if failure.is_some() {
            st.failed.insert(slot);
        }
        st.outstanding -= 1;
        if st.outstanding == 0 {
            barrier.done.notify_one();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_panic_messages() {
        let payload = panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 1");

        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static");

        let payload = panic::catch_unwind(|| std::panic::panic_any(42u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "<non-string panic payload>");
    }

    #[test]
    fn armed_worker_exits_on_shutdown_without_running() {
        use crate::Dispatch::UnitResult;
        use std::sync::atomic::{AtomicBool, Ordering};

        let barrier = Arc::new(Barrier::new());
        let wake = Arc::new(Condvar::new());
        {
            let mut st = barrier.state.lock();
            st.slots.push(SlotState::Armed);
            st.wakers.push(Arc::clone(&wake));
            st.outstanding = 1;
            st.cycle = 1;
            st.shutdown = true;
        }

        let ran = Arc::new(AtomicBool::new(false));
        let unit_ran = Arc::clone(&ran);
        let unit: Box<dyn WorkUnit> = Box::new(move |_: SlotId| -> UnitResult {
            unit_ran.store(true, Ordering::SeqCst);
            Ok(())
        });

        let worker_barrier = Arc::clone(&barrier);
        std::thread::spawn(move || worker_loop(worker_barrier, SlotId(0), wake, unit))
            .join()
            .unwrap();

        let st = barrier.state.lock();
        assert_eq!(st.slots[0], SlotState::Exited);
        assert_eq!(st.outstanding, 0);
        assert!(st.interrupted);
        assert!(st.failed.is_empty());
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn shutdown_request_is_write_once() {
        let barrier = Barrier::new();
        assert!(barrier.request_shutdown());
        assert!(!barrier.request_shutdown());
        assert!(barrier.state.lock().shutdown);
    }
}
