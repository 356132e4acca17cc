//! Streaming digest adapters.
//!
//! Every backend is wrapped behind [`HashAlgorithm`], which reads a file from
//! disk in bounded chunks and returns the final digest with its bit length.
//! RustCrypto hashes are driven through their incremental `update`/`finalize`
//! interface; the non-cryptographic hashes only expose `std::hash::Hasher`, so
//! the file is pushed into them through an [`io::Write`] sink instead.

use crate::error::BenchError;
use blake2::Blake2b512;
use clap::ValueEnum;
use md5::Md5;
use metrohash::{MetroHash128, MetroHash64};
use sha1::Sha1;
use sha2::{Digest as CryptoDigest, Sha224, Sha256, Sha384, Sha512};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::hash::Hasher;
use std::io::{self, BufReader, Read, Write};
use std::marker::PhantomData;
use std::path::Path;
use twox_hash::XxHash32;

pub const READ_BUFFER_SIZE: usize = 64 * 1024; // 64KB

pub const XXHASH_SEED: u32 = 0xCAFE_BABE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum AlgorithmName {
    #[value(name = "blake2b")]
    Blake2b,
    #[value(name = "md5")]
    Md5,
    #[value(name = "sha1")]
    Sha1,
    #[value(name = "sha224")]
    Sha224,
    #[value(name = "sha256")]
    Sha256,
    #[value(name = "sha384")]
    Sha384,
    #[value(name = "sha512")]
    Sha512,
    #[value(name = "metroHash64")]
    MetroHash64,
    #[value(name = "metroHash128")]
    MetroHash128,
    #[value(name = "xxhash")]
    Xxhash,
}

impl AlgorithmName {
    pub const ALL: [AlgorithmName; 10] = [
        AlgorithmName::Blake2b,
        AlgorithmName::Md5,
        AlgorithmName::Sha1,
        AlgorithmName::Sha224,
        AlgorithmName::Sha256,
        AlgorithmName::Sha384,
        AlgorithmName::Sha512,
        AlgorithmName::MetroHash64,
        AlgorithmName::MetroHash128,
        AlgorithmName::Xxhash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmName::Blake2b => "blake2b",
            AlgorithmName::Md5 => "md5",
            AlgorithmName::Sha1 => "sha1",
            AlgorithmName::Sha224 => "sha224",
            AlgorithmName::Sha256 => "sha256",
            AlgorithmName::Sha384 => "sha384",
            AlgorithmName::Sha512 => "sha512",
            AlgorithmName::MetroHash64 => "metroHash64",
            AlgorithmName::MetroHash128 => "metroHash128",
            AlgorithmName::Xxhash => "xxhash",
        }
    }
}

impl fmt::Display for AlgorithmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final output of a hash run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub bytes: Vec<u8>,
    pub bits: u32,
}

impl Digest {
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

pub trait HashAlgorithm: Send + Sync {
    fn name(&self) -> AlgorithmName;

    /// Native output size, constant for a given algorithm.
    fn digest_bits(&self) -> u32;

    /// Streams the file at `path` through the hash.
    fn digest(&self, path: &Path) -> Result<Digest, BenchError>;
}

fn hash_error(algorithm: AlgorithmName, path: &Path, source: io::Error) -> BenchError {
    BenchError::Hash {
        algorithm,
        path: path.to_path_buf(),
        source,
    }
}

/// Adapter for RustCrypto hashes (incremental update/finalize).
pub struct StreamingDigest<D> {
    name: AlgorithmName,
    _hasher: PhantomData<fn() -> D>,
}

impl<D: CryptoDigest> StreamingDigest<D> {
    pub fn new(name: AlgorithmName) -> Self {
        Self {
            name,
            _hasher: PhantomData,
        }
    }
}

impl<D: CryptoDigest> HashAlgorithm for StreamingDigest<D> {
    fn name(&self) -> AlgorithmName {
        self.name
    }

    fn digest_bits(&self) -> u32 {
        (<D as CryptoDigest>::output_size() * 8) as u32
    }

    fn digest(&self, path: &Path) -> Result<Digest, BenchError> {
        let mut file = File::open(path).map_err(|e| hash_error(self.name, path, e))?;
        let mut hasher = D::new();
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(hash_error(self.name, path, e)),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Digest {
            bytes: hasher.finalize().to_vec(),
            bits: self.digest_bits(),
        })
    }
}

/// Write side of a `std::hash::Hasher`, so a reader can be copied into it.
struct HasherSink<H>(H);

impl<H: Hasher> Write for HasherSink<H> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapter for hashes that only implement `std::hash::Hasher`.
///
/// `finish` extracts the native-width output, which may be narrower or wider
/// than the `u64` that `Hasher::finish` reports.
pub struct HasherStream<H> {
    name: AlgorithmName,
    bits: u32,
    make: fn() -> H,
    finish: fn(&H) -> Vec<u8>,
}

impl<H: Hasher> HasherStream<H> {
    pub fn new(
        name: AlgorithmName,
        bits: u32,
        make: fn() -> H,
        finish: fn(&H) -> Vec<u8>,
    ) -> Self {
        Self {
            name,
            bits,
            make,
            finish,
        }
    }
}

impl<H: Hasher> HashAlgorithm for HasherStream<H> {
    fn name(&self) -> AlgorithmName {
        self.name
    }

    fn digest_bits(&self) -> u32 {
        self.bits
    }

    fn digest(&self, path: &Path) -> Result<Digest, BenchError> {
        let file = File::open(path).map_err(|e| hash_error(self.name, path, e))?;
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let mut sink = HasherSink((self.make)());

        io::copy(&mut reader, &mut sink).map_err(|e| hash_error(self.name, path, e))?;

        Ok(Digest {
            bytes: (self.finish)(&sink.0),
            bits: self.bits,
        })
    }
}

// MetroHash digests are the little-endian image of the state words.
fn metro64_bytes(hasher: &MetroHash64) -> Vec<u8> {
    hasher.finish().to_le_bytes().to_vec()
}

fn metro128_bytes(hasher: &MetroHash128) -> Vec<u8> {
    let (h1, h2) = hasher.finish128();
    let mut bytes = h1.to_le_bytes().to_vec();
    bytes.extend_from_slice(&h2.to_le_bytes());
    bytes
}

// XxHash32 widens its 32-bit state to u64 through `Hasher::finish`.
fn xxhash32_bytes(hasher: &XxHash32) -> Vec<u8> {
    (Hasher::finish(hasher) as u32).to_be_bytes().to_vec()
}

/// Immutable lookup table from algorithm name to its adapter.
#[derive(Default)]
pub struct Registry {
    algorithms: HashMap<AlgorithmName, Box<dyn HashAlgorithm>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding an adapter for every [`AlgorithmName`].
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(StreamingDigest::<Blake2b512>::new(AlgorithmName::Blake2b)));
        registry.register(Box::new(StreamingDigest::<Md5>::new(AlgorithmName::Md5)));
        registry.register(Box::new(StreamingDigest::<Sha1>::new(AlgorithmName::Sha1)));
        registry.register(Box::new(StreamingDigest::<Sha224>::new(AlgorithmName::Sha224)));
        registry.register(Box::new(StreamingDigest::<Sha256>::new(AlgorithmName::Sha256)));
        registry.register(Box::new(StreamingDigest::<Sha384>::new(AlgorithmName::Sha384)));
        registry.register(Box::new(StreamingDigest::<Sha512>::new(AlgorithmName::Sha512)));
        registry.register(Box::new(HasherStream::new(
            AlgorithmName::MetroHash64,
            64,
            MetroHash64::default,
            metro64_bytes,
        )));
        registry.register(Box::new(HasherStream::new(
            AlgorithmName::MetroHash128,
            128,
            MetroHash128::default,
            metro128_bytes,
        )));
        registry.register(Box::new(HasherStream::new(
            AlgorithmName::Xxhash,
            32,
            || XxHash32::with_seed(XXHASH_SEED),
            xxhash32_bytes,
        )));
        registry
    }

    /// Adds `algorithm`, replacing any adapter already registered under its name.
    pub fn register(&mut self, algorithm: Box<dyn HashAlgorithm>) {
        self.algorithms.insert(algorithm.name(), algorithm);
    }

    pub fn get(&self, name: AlgorithmName) -> Option<&dyn HashAlgorithm> {
        self.algorithms.get(&name).map(|a| a.as_ref())
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}
