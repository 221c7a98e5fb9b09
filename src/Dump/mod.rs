mod config;
mod context;
mod writer;

pub use config::{DumpChannel, DumpConfig, DEFAULT_CONFIG_PATH, DEFAULT_QUEUE_CAPACITY};
pub use context::DumpContext;
pub use writer::DumpSummary;
