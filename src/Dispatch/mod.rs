mod barrier;
mod builder;
mod dispatcher;
mod driver;
mod slot;
mod work_unit;

pub use builder::DispatcherBuilder;
pub use dispatcher::{CycleResult, Dispatcher, ShutdownHandle};
pub use driver::{CycleDriver, DriverConfig, DriverReport};
pub use slot::{SlotState, WorkerSlot};
pub use work_unit::{SlotId, UnitError, UnitResult, WorkUnit};

mod debug {
    use super::{Dispatcher, ShutdownHandle, WorkerSlot};
    use std::fmt;

    // Debug proxy implementations that call the standalone debug functions
    impl fmt::Debug for Dispatcher {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            crate::Debug::StructDebug::debug_dispatcher(self, f)
        }
    }

    impl fmt::Debug for WorkerSlot {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            crate::Debug::StructDebug::debug_worker_slot(self, f)
        }
    }

    impl fmt::Debug for ShutdownHandle {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            crate::Debug::StructDebug::debug_shutdown_handle(self, f)
        }
    }
}
