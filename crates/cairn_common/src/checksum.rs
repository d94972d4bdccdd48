//! Incremental, order-sensitive multi-item checksum.
//!
//! A [`HashChecksum`] folds the digest of every item into a running digest,
//! so the final value depends on both the content and the order of the items.
//! Instances are single-use and not meant to be shared between threads.

use crate::error::HashError;
use crate::hash::{HashAlgorithm, StreamingDigest};

/// Single-use accumulator for the digests of a known number of items.
///
/// Each `update` hashes one item, folds the item digest into the running
/// digest and returns the item digest so callers can record it. The running
/// digest becomes available through [`digest`](Self::digest) once exactly the
/// announced number of items has been folded in.
pub struct HashChecksum {
    algorithm: HashAlgorithm,
    expected: usize,
    updates: usize,
    running: Option<StreamingDigest>,
}

impl HashChecksum {
    /// Creates a checksum that expects exactly `expected` updates.
    pub fn new(algorithm: HashAlgorithm, expected: usize) -> Self {
        Self {
            algorithm,
            expected,
            updates: 0,
            running: Some(StreamingDigest::new(algorithm)),
        }
    }

    /// Returns the algorithm this checksum was created with.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Returns how many items have been folded in so far.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Hashes `data` as one item and folds it into the running digest.
    ///
    /// Returns the hex digest of `data` alone.
    pub fn update(&mut self, data: &[u8]) -> Result<String, HashError> {
        let item = self.algorithm.digest(data);
        self.fold(&item)?;
        Ok(hex::encode(item))
    }

    /// Folds an already computed hex digest in as one item.
    ///
    /// Returns the (lowercased) digest unchanged.
    pub fn update_hash(&mut self, hex_digest: &str) -> Result<String, HashError> {
        let item = hex::decode(hex_digest.trim()).map_err(|e| HashError::InvalidHex {
            value: hex_digest.to_string(),
            reason: e.to_string(),
        })?;
        self.fold(&item)?;
        Ok(hex::encode(item))
    }

    /// Completes the checksum and returns the accumulated hex digest.
    ///
    /// Fails if fewer items than announced were folded in, or if the checksum
    /// was already digested.
    pub fn digest(&mut self) -> Result<String, HashError> {
        if self.running.is_none() {
            return Err(HashError::AlreadyDigested);
        }
        if self.updates != self.expected {
            return Err(HashError::PrematureDigest {
                expected: self.expected,
                actual: self.updates,
            });
        }
        let running = self.running.take().ok_or(HashError::AlreadyDigested)?;
        Ok(hex::encode(running.finish()))
    }

    fn fold(&mut self, item: &[u8]) -> Result<(), HashError> {
        let expected = self.expected;
        let running = self.running.as_mut().ok_or(HashError::AlreadyDigested)?;
        if self.updates >= expected {
            return Err(HashError::TooManyUpdates { expected });
        }
        running.update(item);
        self.updates += 1;
        Ok(())
    }
}

impl std::fmt::Debug for HashChecksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashChecksum")
            .field("algorithm", &self.algorithm)
            .field("expected", &self.expected)
            .field("updates", &self.updates)
            .field("digested", &self.running.is_none())
            .finish()
    }
}
