// Owned replacement for a process-wide log queue: the queue, the wakeup
// mutex/condvar and the termination flag all live and die with one context.

use super::config::DumpConfig;
use super::writer::{DumpSummary, DumpWriter};
use crate::Core::{Error, Result};
use crate::SPSC::{ChannelBuilder, Producer};
use crossbeam_utils::Backoff;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

pub(crate) struct Record {
    pub(crate) channel: usize,
    pub(crate) text: String,
}

pub(crate) struct SignalState {
    /// Records were pushed since the writer last looked.
    pub(crate) pending: bool,
    /// No more records will come; drain and exit.
    pub(crate) terminate: bool,
    /// The writer thread has returned, normally or on error.
    pub(crate) writer_done: bool,
}

pub(crate) struct Signal {
    pub(crate) state: Mutex<SignalState>,
    pub(crate) cv: Condvar,
}

/// A running dump writer: the submitting side holds the context, the writer
/// thread holds the other end of its queue.
///
/// The submitting thread is the queue's only producer, which is why
/// `submit` takes `&mut self`.
pub struct DumpContext {
    producer: Producer<Record>,
    index: HashMap<String, usize>,
    signal: Arc<Signal>,
    writer: Option<JoinHandle<Result<DumpSummary>>>,
    submitted: u64,
}

impl DumpContext {
    /// Create the output directory and start the writer thread.
    pub fn start(config: DumpConfig) -> Result<Self> {
        let (producer, consumer) = ChannelBuilder::new()
            .with_capacity(config.queue_capacity())
            .build::<Record>()?;
        std::fs::create_dir_all(config.output_dir())?;

        let channels: Arc<[String]> = config.active_channels().map(String::from).collect();
        let index = channels
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        let signal = Arc::new(Signal {
            state: Mutex::new(SignalState {
                pending: false,
                terminate: false,
                writer_done: false,
            }),
            cv: Condvar::new(),
        });

        let writer = DumpWriter::new(
            consumer,
            Arc::clone(&channels),
            config.output_dir().to_path_buf(),
            Arc::clone(&signal),
        );
        let name = "dump-writer".to_string();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || writer.run())
            .map_err(|source| Error::Spawn { name, source })?;

        info!(
            channels = channels.len(),
            queue_capacity = config.queue_capacity(),
            "dump writer started"
        );
        Ok(Self {
            producer,
            index,
            signal,
            writer: Some(handle),
            submitted: 0,
        })
    }

    /// Queue `text` as one line of `channel`.
    ///
    /// Returns `false` without queuing if the channel is unknown or inactive,
    /// or if the writer thread already stopped. While the queue is full this
    /// stalls the caller until the writer catches up.
    pub fn submit(&mut self, channel: &str, text: impl Into<String>) -> bool {
        let Some(&index) = self.index.get(channel) else {
            trace!(channel, "dump channel inactive, record dropped");
            return false;
        };
        if !self.is_writer_alive() {
            warn!(channel, "dump writer stopped, record dropped");
            return false;
        }

        let mut record = Record {
            channel: index,
            text: text.into(),
        };
        let backoff = Backoff::new();
        loop {
            match self.producer.push(record) {
                Ok(()) => break,
                Err(rejected) => {
                    record = rejected;
                    if backoff.is_completed() && self.signal.state.lock().writer_done {
                        warn!(channel, "dump writer stopped, record dropped");
                        return false;
                    }
                    self.wake_writer();
                    backoff.snooze();
                }
            }
        }

        self.submitted += 1;
        self.wake_writer();
        true
    }

    /// Records accepted by `submit` so far.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// `false` once the writer thread returned, e.g. after an I/O error.
    /// Records submitted from then on are refused.
    pub fn is_writer_alive(&self) -> bool {
        !self.signal.state.lock().writer_done
    }

    pub fn is_active(&self, channel: &str) -> bool {
        self.index.contains_key(channel)
    }

    /// Stop the writer after it drained every queued record, and report.
    pub fn finish(mut self) -> Result<DumpSummary> {
        self.stop()
    }

    fn wake_writer(&self) {
        let mut st = self.signal.state.lock();
        st.pending = true;
        self.signal.cv.notify_one();
    }

    fn stop(&mut self) -> Result<DumpSummary> {
        let Some(handle) = self.writer.take() else {
            return Ok(DumpSummary::default());
        };

        {
            let mut st = self.signal.state.lock();
            st.terminate = true;
            self.signal.cv.notify_one();
        }

        let summary = handle.join().map_err(|_| Error::WriterPanicked)??;
        debug!(
            submitted = self.submitted,
            written = summary.records,
            "dump writer joined"
        );
        Ok(summary)
    }
}

impl Drop for DumpContext {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "dump writer failed during teardown");
        }
    }
}
