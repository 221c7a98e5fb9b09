// Module naming follows project convention (SPSC = Single-Producer Single-Consumer)
#[allow(non_snake_case)]
pub mod SPSC {
    pub mod Buffer {
        pub mod Buffer;
        pub mod Buffer_impl;
        pub mod layout;
        pub use Buffer::RingBuffer; // re-export for stable path
    }

    mod builder;
    mod consumer;
    mod debug;
    mod producer;

    pub use builder::{ring_buffer, ChannelBuilder};
    pub use consumer::Consumer;
    pub use producer::Producer;
}
#[allow(non_snake_case)]
pub mod Dispatch;
#[allow(non_snake_case)]
pub mod Dump;
#[allow(non_snake_case)]
pub mod Core {
    pub mod affinity;
    pub mod error;
    pub use error::{Error, Result};
}
#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}

pub use Core::{Error, Result};
pub use Dispatch::{CycleResult, Dispatcher, SlotId, WorkUnit};
pub use SPSC::{ring_buffer, Consumer, Producer};
