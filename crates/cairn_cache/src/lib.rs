//! Local storage of recorded builds.
//!
//! A [`BuildStore`] keeps one JSON build record per unit and serves those
//! records as baselines to the fingerprint calculator. Reads are fail-safe:
//! a missing or unreadable record is a baseline miss, never an error.

#![warn(missing_docs)]

pub mod error;
pub mod store;

pub use error::CacheError;
pub use store::{BuildStore, BUILD_INFO_FILE};
