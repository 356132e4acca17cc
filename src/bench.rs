//! Sequential benchmark over the configured algorithms.
//!
//! Algorithms run one after another on the calling thread, and so do the
//! attempts inside each of them: only one measurement is ever in flight.

use crate::error::{BenchError, BenchmarkAborted};
use crate::hashing::{AlgorithmName, Registry};
use crate::trial::{run_trials, ProgressSink, TrialResult};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    pub algorithms: Vec<AlgorithmName>,
    pub attempts: u32,
    pub file_size: u64,
    pub dir: Option<PathBuf>,
}

impl BenchmarkConfig {
    /// Validates the settings and drops repeated algorithms, keeping the
    /// first occurrence of each.
    pub fn new(
        algorithms: Vec<AlgorithmName>,
        attempts: u32,
        file_size: u64,
        dir: Option<PathBuf>,
    ) -> Result<Self, BenchError> {
        if attempts == 0 {
            return Err(BenchError::Config("attempts must be greater than 0".into()));
        }

        let mut unique = Vec::with_capacity(algorithms.len());
        for algorithm in algorithms {
            if !unique.contains(&algorithm) {
                unique.push(algorithm);
            }
        }
        if unique.is_empty() {
            return Err(BenchError::Config("no algorithms selected".into()));
        }

        if let Some(dir) = &dir {
            if !dir.is_dir() {
                return Err(BenchError::Config(format!(
                    "{} is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            algorithms: unique,
            attempts,
            file_size,
            dir,
        })
    }
}

/// Benchmarks every configured algorithm in order.
///
/// Stops at the first failure; the returned error carries the results of the
/// algorithms that had already finished.
pub fn run_benchmark(
    config: &BenchmarkConfig,
    registry: &Registry,
    sink: &dyn ProgressSink,
) -> Result<Vec<TrialResult>, BenchmarkAborted> {
    let mut results: Vec<TrialResult> = Vec::with_capacity(config.algorithms.len());

    for &name in &config.algorithms {
        let outcome = match registry.get(name) {
            Some(algorithm) => {
                sink.on_algorithm_start(name, config.attempts);
                run_trials(
                    algorithm,
                    config.attempts,
                    config.file_size,
                    config.dir.as_deref(),
                    sink,
                )
            }
            None => Err(BenchError::Config(format!("{} is not registered", name))),
        };

        match outcome {
            Ok(result) => {
                sink.on_algorithm_finish(&result);
                results.push(result);
            }
            Err(source) => {
                return Err(BenchmarkAborted {
                    algorithm: name,
                    completed: results,
                    source,
                })
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::NoProgress;
    use anyhow::Result;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Started {
        algorithms: RefCell<Vec<AlgorithmName>>,
    }

    impl ProgressSink for Started {
        fn on_generate_start(&self, _index: u32) {}
        fn on_hash_start(&self, _index: u32) {}
        fn on_algorithm_start(&self, algorithm: AlgorithmName, _attempts: u32) {
            self.algorithms.borrow_mut().push(algorithm);
        }
    }

    #[test]
    fn test_config_dedups_in_order() -> Result<()> {
        let config = BenchmarkConfig::new(
            vec![
                AlgorithmName::Sha256,
                AlgorithmName::Md5,
                AlgorithmName::Sha256,
                AlgorithmName::Xxhash,
                AlgorithmName::Md5,
            ],
            2,
            10,
            None,
        )?;
        assert_eq!(
            config.algorithms,
            vec![AlgorithmName::Sha256, AlgorithmName::Md5, AlgorithmName::Xxhash]
        );
        Ok(())
    }

    #[test]
    fn test_config_rejects_invalid_input() {
        assert!(matches!(
            BenchmarkConfig::new(vec![AlgorithmName::Md5], 0, 10, None),
            Err(BenchError::Config(_))
        ));
        assert!(matches!(
            BenchmarkConfig::new(vec![], 1, 10, None),
            Err(BenchError::Config(_))
        ));
        assert!(matches!(
            BenchmarkConfig::new(
                vec![AlgorithmName::Md5],
                1,
                10,
                Some(PathBuf::from("no_such_dir_hashbench"))
            ),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn test_runs_in_config_order() -> Result<()> {
        let dir = tempdir()?;
        let config = BenchmarkConfig::new(
            vec![AlgorithmName::Xxhash, AlgorithmName::Blake2b, AlgorithmName::Sha1],
            2,
            4096,
            Some(dir.path().to_path_buf()),
        )?;
        let sink = Started::default();

        let results = run_benchmark(&config, &Registry::standard(), &sink)?;

        let order: Vec<_> = results.iter().map(|r| r.algorithm).collect();
        assert_eq!(order, config.algorithms);
        assert_eq!(*sink.algorithms.borrow(), config.algorithms);
        assert!(results.iter().all(|r| r.elapsed_millis.len() == 2));
        Ok(())
    }

    #[test]
    fn test_generation_failure_halts_remaining_algorithms() -> Result<()> {
        let dir = tempdir()?;
        let work_dir = dir.path().join("work");
        fs::create_dir(&work_dir)?;
        let config = BenchmarkConfig::new(
            vec![AlgorithmName::Md5, AlgorithmName::Sha256],
            3,
            128,
            Some(work_dir.clone()),
        )?;
        // The directory disappears after validation, so the first file cannot be created.
        fs::remove_dir(&work_dir)?;
        let sink = Started::default();

        let aborted = run_benchmark(&config, &Registry::standard(), &sink).unwrap_err();

        assert_eq!(aborted.algorithm, AlgorithmName::Md5);
        assert!(aborted.completed.is_empty());
        assert!(matches!(aborted.source, BenchError::Resource { .. }));
        assert_eq!(*sink.algorithms.borrow(), vec![AlgorithmName::Md5]);
        Ok(())
    }

    #[test]
    fn test_unregistered_algorithm_keeps_completed_results() -> Result<()> {
        let mut registry = Registry::new();
        registry.register(Box::new(crate::hashing::StreamingDigest::<md5::Md5>::new(
            AlgorithmName::Md5,
        )));

        let config = BenchmarkConfig::new(
            vec![AlgorithmName::Md5, AlgorithmName::Sha512, AlgorithmName::Sha1],
            1,
            256,
            None,
        )?;

        let aborted = run_benchmark(&config, &registry, &NoProgress).unwrap_err();
        assert_eq!(aborted.algorithm, AlgorithmName::Sha512);
        assert_eq!(aborted.completed.len(), 1);
        assert_eq!(aborted.completed[0].algorithm, AlgorithmName::Md5);
        assert!(matches!(aborted.source, BenchError::Config(_)));
        Ok(())
    }
}
