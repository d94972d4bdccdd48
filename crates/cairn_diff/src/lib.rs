//! Baseline comparison of recorded builds.
//!
//! [`compare`] explains why a current build cannot reuse a baseline build by
//! listing every discrepancy between the two records as a [`Mismatch`]. The
//! comparison is a pure function over the records: it performs no I/O and
//! never fails on content differences.
//!
//! [`Mismatch`]: cairn_model::Mismatch

#![warn(missing_docs)]

pub mod compare;

pub use compare::{compare, CacheDiff};
