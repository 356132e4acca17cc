use crate::hashing::AlgorithmName;
use crate::trial::TrialResult;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not allocate a temporary file in {}: {source}", dir.display())]
    Resource {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{algorithm} failed while hashing {}: {source}", path.display())]
    Hash {
        algorithm: AlgorithmName,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A benchmark run that stopped at `algorithm`.
///
/// `completed` holds the results of every algorithm that finished before the
/// failure, in run order.
#[derive(Debug, Error)]
#[error("benchmark of {algorithm} failed: {source}")]
pub struct BenchmarkAborted {
    pub algorithm: AlgorithmName,
    pub completed: Vec<TrialResult>,
    #[source]
    pub source: BenchError,
}
