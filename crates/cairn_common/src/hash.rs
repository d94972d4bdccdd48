//! One-way digest algorithms selectable by name.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use sha2::{Digest, Sha256, Sha384, Sha512};
use xxhash_rust::xxh3::Xxh3;
use xxhash_rust::xxh64::Xxh64;

use crate::checksum::HashChecksum;
use crate::error::HashError;

/// Read buffer size used when hashing files.
const FILE_BUFFER_SIZE: usize = 64 * 1024;

/// A deterministic digest algorithm family.
///
/// Every fingerprint records the name of the algorithm that produced it, and
/// fingerprints produced by different families are never comparable. Digests
/// are rendered as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256 (32-byte digest).
    Sha256,
    /// SHA-384 (48-byte digest).
    Sha384,
    /// SHA-512 (64-byte digest).
    Sha512,
    /// XXH64 with seed 0 (8-byte digest).
    Xx,
    /// XXH3-128 (16-byte digest).
    Xxh3,
    /// BLAKE3 (32-byte digest).
    Blake3,
}

impl HashAlgorithm {
    /// All supported algorithm families.
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Xx,
        HashAlgorithm::Xxh3,
        HashAlgorithm::Blake3,
    ];

    /// Resolves an algorithm by its configuration name.
    ///
    /// Matching is case-insensitive and tolerates a missing dash in the SHA
    /// names (`sha256` is accepted for `SHA-256`).
    pub fn from_name(name: &str) -> Result<Self, HashError> {
        let wanted = name.trim().to_ascii_uppercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|alg| alg.name().replace('-', "") == wanted)
            .ok_or_else(|| HashError::UnknownAlgorithm(name.to_string()))
    }

    /// Returns the canonical configuration name of this algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Xx => "XX",
            HashAlgorithm::Xxh3 => "XXH3",
            HashAlgorithm::Blake3 => "BLAKE3",
        }
    }

    /// Hashes a byte slice and returns the raw digest bytes.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut stream = StreamingDigest::new(*self);
        stream.update(data);
        stream.finish()
    }

    /// Hashes a byte slice and returns the digest as lowercase hex.
    pub fn hash(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }

    /// Hashes the full content of a file, streaming it from disk.
    pub fn hash_file(&self, path: &Path) -> std::io::Result<String> {
        let mut file = std::fs::File::open(path)?;
        let mut stream = StreamingDigest::new(*self);
        let mut buf = vec![0u8; FILE_BUFFER_SIZE];
        loop {
            let read = file.read(&mut buf)?;
            if read == 0 {
                break;
            }
            stream.update(&buf[..read]);
        }
        Ok(hex::encode(stream.finish()))
    }

    /// Creates a single-use multi-item checksum expecting `count` updates.
    pub fn create_checksum(&self, count: usize) -> HashChecksum {
        HashChecksum::new(*self, count)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Incremental digest state for one algorithm family.
pub(crate) enum StreamingDigest {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Xx(Xxh64),
    Xxh3(Box<Xxh3>),
    Blake3(Box<blake3::Hasher>),
}

impl StreamingDigest {
    pub(crate) fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => StreamingDigest::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => StreamingDigest::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => StreamingDigest::Sha512(Sha512::new()),
            HashAlgorithm::Xx => StreamingDigest::Xx(Xxh64::new(0)),
            HashAlgorithm::Xxh3 => StreamingDigest::Xxh3(Box::new(Xxh3::new())),
            HashAlgorithm::Blake3 => StreamingDigest::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        match self {
            StreamingDigest::Sha256(h) => h.update(data),
            StreamingDigest::Sha384(h) => h.update(data),
            StreamingDigest::Sha512(h) => h.update(data),
            StreamingDigest::Xx(h) => h.update(data),
            StreamingDigest::Xxh3(h) => h.update(data),
            StreamingDigest::Blake3(h) => {
                h.update(data);
            }
        }
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        match self {
            StreamingDigest::Sha256(h) => h.finalize().to_vec(),
            StreamingDigest::Sha384(h) => h.finalize().to_vec(),
            StreamingDigest::Sha512(h) => h.finalize().to_vec(),
            StreamingDigest::Xx(h) => h.digest().to_be_bytes().to_vec(),
            StreamingDigest::Xxh3(h) => h.digest128().to_be_bytes().to_vec(),
            StreamingDigest::Blake3(h) => h.finalize().as_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_every_family() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(alg.hash(b"hello world"), alg.hash(b"hello world"), "{alg}");
        }
    }

    #[test]
    fn different_inputs_differ() {
        for alg in HashAlgorithm::ALL {
            assert_ne!(alg.hash(b"hello"), alg.hash(b"world"), "{alg}");
        }
    }

    #[test]
    fn digest_widths() {
        assert_eq!(HashAlgorithm::Sha256.hash(b"x").len(), 64);
        assert_eq!(HashAlgorithm::Sha384.hash(b"x").len(), 96);
        assert_eq!(HashAlgorithm::Sha512.hash(b"x").len(), 128);
        assert_eq!(HashAlgorithm::Xx.hash(b"x").len(), 16);
        assert_eq!(HashAlgorithm::Xxh3.hash(b"x").len(), 32);
        assert_eq!(HashAlgorithm::Blake3.hash(b"x").len(), 64);
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            HashAlgorithm::Sha256.hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn from_name_is_lenient() {
        assert_eq!(HashAlgorithm::from_name("SHA-256").unwrap(), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::from_name("sha512").unwrap(), HashAlgorithm::Sha512);
        assert_eq!(HashAlgorithm::from_name(" xx ").unwrap(), HashAlgorithm::Xx);
        assert_eq!("blake3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
    }

    #[test]
    fn from_name_rejects_unknown() {
        let err = HashAlgorithm::from_name("METRO").unwrap_err();
        assert!(matches!(err, HashError::UnknownAlgorithm(ref n) if n == "METRO"));
    }

    #[test]
    fn name_roundtrips() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(HashAlgorithm::from_name(alg.name()).unwrap(), alg);
        }
    }

    #[test]
    fn hash_file_matches_in_memory_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.jar");
        let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        for alg in HashAlgorithm::ALL {
            assert_eq!(alg.hash_file(&path).unwrap(), alg.hash(&content), "{alg}");
        }
    }

    #[test]
    fn hash_file_nonexistent_errors() {
        let result = HashAlgorithm::Xx.hash_file(Path::new("/nonexistent/artifact.jar"));
        assert!(result.is_err());
    }
}
