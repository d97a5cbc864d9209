use thiserror::Error;

/// Trace check errors.
///
/// Only input failures surface here; anomalies inside the traces are
/// reported in the output stream.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] revtrace_parse::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
