use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the crate's fallible, recoverable operations.
///
/// Transient queue conditions (full/empty) are not errors; they come back
/// through the return value of `push`/`pop`. Contract violations on the
/// dispatcher panic instead of returning here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("ring buffer capacity must be in 1..={max}, got {requested}")]
    InvalidCapacity { requested: usize, max: usize },

    #[error("failed to spawn thread `{name}`: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read dump config at {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("dump writer I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("dump writer thread panicked")]
    WriterPanicked,
}

pub type Result<T> = std::result::Result<T, Error>;
