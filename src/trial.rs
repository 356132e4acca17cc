use crate::error::BenchError;
use crate::generate::generate_random_file;
use crate::hashing::{AlgorithmName, HashAlgorithm};
use std::io;
use std::path::Path;
use std::time::Instant;

/// Receives progress notifications from the benchmark.
///
/// Only the two per-attempt events are required; the rest default to no-ops.
pub trait ProgressSink {
    fn on_generate_start(&self, index: u32);
    fn on_hash_start(&self, index: u32);

    fn on_algorithm_start(&self, _algorithm: AlgorithmName, _attempts: u32) {}
    fn on_algorithm_finish(&self, _result: &TrialResult) {}

    /// A generated file could not be removed after a successful hash.
    fn on_cleanup_failed(&self, _path: &Path, _error: &io::Error) {}
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_generate_start(&self, _index: u32) {}
    fn on_hash_start(&self, _index: u32) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    pub algorithm: AlgorithmName,
    pub digest_bits: u32,
    /// Hash time of each attempt in milliseconds, in attempt order.
    pub elapsed_millis: Vec<f64>,
}

impl TrialResult {
    pub fn mean_millis(&self) -> f64 {
        if self.elapsed_millis.is_empty() {
            return 0.0;
        }
        self.elapsed_millis.iter().sum::<f64>() / self.elapsed_millis.len() as f64
    }
}

/// Runs `attempts` generate-then-hash cycles for one algorithm.
///
/// Only the digest call is timed. Each file is deleted right after it is
/// hashed; on an error the file is still removed when its `TempPath` drops,
/// and the timings gathered so far are discarded.
pub fn run_trials(
    algorithm: &dyn HashAlgorithm,
    attempts: u32,
    file_size: u64,
    dir: Option<&Path>,
    sink: &dyn ProgressSink,
) -> Result<TrialResult, BenchError> {
    let mut elapsed_millis = Vec::with_capacity(attempts as usize);
    let mut digest_bits = None;

    for index in 0..attempts {
        sink.on_generate_start(index);
        let file = generate_random_file(file_size, dir)?;

        sink.on_hash_start(index);
        let start = Instant::now();
        let digest = algorithm.digest(&file)?;
        let elapsed = start.elapsed();

        elapsed_millis.push(elapsed.as_secs_f64() * 1000.0);
        digest_bits.get_or_insert(digest.bits);

        let path = file.to_path_buf();
        if let Err(e) = file.close() {
            sink.on_cleanup_failed(&path, &e);
        }
    }

    Ok(TrialResult {
        algorithm: algorithm.name(),
        digest_bits: digest_bits.unwrap_or_else(|| algorithm.digest_bits()),
        elapsed_millis,
    })
}
