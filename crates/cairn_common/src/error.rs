//! Error types for hashing and checksum accumulation.

/// Errors raised by [`HashAlgorithm`](crate::HashAlgorithm) and
/// [`HashChecksum`](crate::HashChecksum).
///
/// The checksum variants are precondition violations: they indicate a bug in
/// the caller (wrong item count, reuse after completion) rather than bad input.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// The requested algorithm name is not one of the supported families.
    #[error("unsupported hash algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// `digest()` was requested before every announced item was folded in.
    #[error("checksum digest requested after {actual} of {expected} updates")]
    PrematureDigest {
        /// Number of items announced when the checksum was created.
        expected: usize,
        /// Number of items folded in so far.
        actual: usize,
    },

    /// More items were folded in than were announced at creation.
    #[error("checksum received more than the {expected} announced updates")]
    TooManyUpdates {
        /// Number of items announced when the checksum was created.
        expected: usize,
    },

    /// The checksum was updated or digested after `digest()` already completed.
    #[error("checksum already digested")]
    AlreadyDigested,

    /// A pre-computed digest could not be decoded from hex.
    #[error("invalid hex digest '{value}': {reason}")]
    InvalidHex {
        /// The offending text.
        value: String,
        /// Why decoding failed.
        reason: String,
    },
}
