use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DegreeError {
    /// One of the two vertex tokens of an edge record is not an integer.
    #[error("line {line_no}: invalid vertex id {token:?} in {line:?}")]
    Parse {
        line_no: usize,
        line: String,
        token: String,
    },
    /// The degree map is empty, so min/max/avg are undefined.
    #[error("no edge records found, degrees are undefined")]
    EmptyGraph,
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The job for this file died (or was never queued) before reporting back.
    #[error("worker stopped before finishing {path:?}")]
    WorkerLost { path: PathBuf },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to write report {path:?}: {message}")]
    Report { path: PathBuf, message: String },
}

impl DegreeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn report(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Report {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DegreeError>;
