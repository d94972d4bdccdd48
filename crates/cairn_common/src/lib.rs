//! Shared foundational types used across the Cairn fingerprinting engine.
//!
//! This crate provides the pluggable one-way digest primitive ([`HashAlgorithm`])
//! and the incremental, order-sensitive multi-item accumulator ([`HashChecksum`])
//! that every fingerprint is folded into.

#![warn(missing_docs)]

pub mod checksum;
pub mod error;
pub mod hash;

pub use checksum::HashChecksum;
pub use error::HashError;
pub use hash::HashAlgorithm;
