use crate::error::BenchError;
use rand::RngCore;
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, TempPath};

/// Random bytes are produced and written this many at a time.
pub const CHUNK_SIZE: usize = 1024;

/// Creates a uniquely named temporary file holding exactly `size` random bytes.
///
/// The file goes into `dir` when given, the platform temp directory otherwise.
/// It stays on disk until the returned [`TempPath`] is closed or dropped.
pub fn generate_random_file(size: u64, dir: Option<&Path>) -> Result<TempPath, BenchError> {
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);

    let mut file = Builder::new()
        .prefix("hashbench-")
        .suffix(".bin")
        .tempfile_in(&dir)
        .map_err(|source| BenchError::Resource {
            dir: dir.clone(),
            source,
        })?;

    let mut rng = rand::thread_rng();
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut remaining = size;

    while remaining > 0 {
        let len = remaining.min(CHUNK_SIZE as u64) as usize;
        rng.fill_bytes(&mut buffer[..len]);
        if let Err(source) = file.write_all(&buffer[..len]) {
            return Err(BenchError::Io {
                path: file.path().to_path_buf(),
                source,
            });
        }
        remaining -= len as u64;
    }

    // Flush to disk now so writeback does not land inside the timed hash.
    if let Err(source) = file.as_file().sync_all() {
        return Err(BenchError::Io {
            path: file.path().to_path_buf(),
            source,
        });
    }

    Ok(file.into_temp_path())
}
