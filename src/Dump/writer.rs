use super::context::{Record, Signal};
use crate::Core::Result;
use crate::SPSC::Consumer;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// What the writer thread did before it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Records written across all channels.
    pub records: u64,
    /// Channel files that were opened (channels never written stay closed).
    pub files_opened: usize,
}

/// Consumer end of the dump queue; runs on its own thread.
pub(crate) struct DumpWriter {
    consumer: Consumer<Record>,
    channels: Arc<[String]>,
    output_dir: PathBuf,
    files: Vec<Option<BufWriter<File>>>,
    signal: Arc<Signal>,
    written: u64,
}

impl DumpWriter {
    pub(crate) fn new(
        consumer: Consumer<Record>,
        channels: Arc<[String]>,
        output_dir: PathBuf,
        signal: Arc<Signal>,
    ) -> Self {
        let files = channels.iter().map(|_| None).collect();
        Self {
            consumer,
            channels,
            output_dir,
            files,
            signal,
            written: 0,
        }
    }

    pub(crate) fn run(mut self) -> Result<DumpSummary> {
        let result = self.pump();
        // Lets a producer stalled on a full queue give up instead of spinning
        self.signal.state.lock().writer_done = true;
        result
    }

    fn pump(&mut self) -> Result<DumpSummary> {
        loop {
            self.drain()?;

            let terminate = {
                let mut st = self.signal.state.lock();
                while !st.pending && !st.terminate {
                    self.signal.cv.wait(&mut st);
                }
                st.pending = false;
                st.terminate
            };

            if terminate {
                // The producer is gone by now; whatever it pushed is queued.
                self.drain()?;
                break;
            }
        }

        let mut files_opened = 0;
        for file in self.files.iter_mut().flatten() {
            file.flush()?;
            files_opened += 1;
        }
        debug!(records = self.written, files_opened, "dump writer finished");

        Ok(DumpSummary {
            records: self.written,
            files_opened,
        })
    }

    fn drain(&mut self) -> Result<()> {
        while let Some(record) = self.consumer.pop() {
            self.write(record)?;
        }
        Ok(())
    }

    fn write(&mut self, record: Record) -> Result<()> {
        let channel = record.channel;
        if self.files[channel].is_none() {
            let path = self.output_dir.join(&self.channels[channel]);
            trace!(path = %path.display(), "opening dump channel");
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            self.files[channel] = Some(BufWriter::new(file));
        }

        if let Some(file) = &mut self.files[channel] {
            writeln!(file, "{}", record.text)?;
            self.written += 1;
        }
        Ok(())
    }
}
