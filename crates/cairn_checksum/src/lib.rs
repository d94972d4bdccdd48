//! Build-unit input fingerprinting.
//!
//! [`ProjectInputCalculator`] computes a reproducible [`ProjectsInputInfo`] for
//! a unit: the canonical effective configuration, every input file found by
//! walking the unit's source roots and probing its plugin configuration, and
//! the fingerprints of the dependencies that can change between builds. Each
//! input is hashed into an order-sensitive rolling checksum.
//!
//! The surrounding build tool supplies the effective models, sibling lookup,
//! artifact resolution and baseline records through the traits in
//! [`services`].
//!
//! [`ProjectsInputInfo`]: cairn_model::ProjectsInputInfo

#![warn(missing_docs)]

pub mod baseline;
pub mod calculator;
pub mod content;
pub mod dependency;
pub mod digest;
pub mod effective;
pub mod error;
pub mod scan;
pub mod services;
pub mod walker;

pub use baseline::BaselineVerdict;
pub use calculator::{CalculatorStats, ProjectInputCalculator};
pub use error::ChecksumError;
pub use services::{
    ArtifactResolver, BaselineRepository, EffectiveModels, LocalRepository, MultiModuleSupport,
    NormalizedModelProvider, Reactor,
};
pub use walker::{PathWalker, WalkKey};
