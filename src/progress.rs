use crate::hashing::AlgorithmName;
use crate::trial::{ProgressSink, TrialResult};
use crate::utils::{format_bytes, Logger};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Console progress: one spinner line showing the current algorithm and attempt.
pub struct SpinnerProgress {
    pb: ProgressBar,
    attempts: AtomicU32,
    file_size: u64,
    logger: Option<Logger>,
}

impl SpinnerProgress {
    pub fn new(file_size: u64, logger: Option<Logger>) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix:.bold}: {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            attempts: AtomicU32::new(0),
            file_size,
            logger,
        }
    }

    fn audit(&self, message: &str) {
        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log(message) {
                self.pb.println(format!("Failed to write audit log: {}", e));
            }
        }
    }

    fn status(&self, index: u32, action: &str) {
        self.pb.set_message(format!(
            "[{}/{}] {} {}",
            index + 1,
            self.attempts.load(Ordering::Relaxed),
            action,
            format_bytes(self.file_size)
        ));
    }

    /// Reports an aborted run and clears the spinner.
    pub fn abort(&self, algorithm: AlgorithmName, error: &dyn std::fmt::Display) {
        self.audit(&format!("Aborted at {}: {}", algorithm, error));
        self.pb.finish_and_clear();
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressSink for SpinnerProgress {
    fn on_generate_start(&self, index: u32) {
        self.status(index, "generating");
    }

    fn on_hash_start(&self, index: u32) {
        self.status(index, "hashing");
    }

    fn on_algorithm_start(&self, algorithm: AlgorithmName, attempts: u32) {
        self.attempts.store(attempts, Ordering::Relaxed);
        self.pb.set_prefix(algorithm.to_string());
    }

    fn on_algorithm_finish(&self, result: &TrialResult) {
        let message = format!(
            "{}: {:.2} ms average over {} attempts ({}-bit digest)",
            result.algorithm,
            result.mean_millis(),
            result.elapsed_millis.len(),
            result.digest_bits
        );
        self.pb.println(&message);
        self.audit(&message);
    }

    fn on_cleanup_failed(&self, path: &Path, error: &io::Error) {
        let message = format!("Failed to delete {:?}: {}", path, error);
        self.pb.println(&message);
        self.audit(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_events_reach_audit_log() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("progress.log");
        let progress = SpinnerProgress::new(1024, Some(Logger::new(&log_path)));

        progress.on_algorithm_start(AlgorithmName::Sha384, 2);
        progress.on_generate_start(0);
        progress.on_hash_start(0);
        progress.on_algorithm_finish(&TrialResult {
            algorithm: AlgorithmName::Sha384,
            digest_bits: 384,
            elapsed_millis: vec![1.0, 3.0],
        });
        progress.on_cleanup_failed(
            Path::new("stale.bin"),
            &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        progress.finish();

        let content = fs::read_to_string(&log_path)?;
        assert!(content.contains("sha384: 2.00 ms average over 2 attempts (384-bit digest)"));
        assert!(content.contains("Failed to delete \"stale.bin\": denied"));
        Ok(())
    }
}
