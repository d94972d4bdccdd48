//! Data shapes shared by the fingerprinting engine and its consumers.
//!
//! This crate defines the build-unit model the engine reads (projects, effective
//! models, dependencies, plugins and their configuration trees) and the data it
//! produces (digest items, fingerprints, build records and diff reports). All
//! types are plain data with `serde` support so the surrounding tooling can
//! persist and exchange them.

#![warn(missing_docs)]

pub mod build;
pub mod diff;
pub mod digest;
pub mod node;
pub mod project;

pub use build::{BuildInfo, CompletedExecution, PropertyValue};
pub use diff::{Diff, Mismatch};
pub use digest::{ContentDetails, DigestItem, DigestType, Eol, ProjectsInputInfo, TextKind};
pub use node::{ConfigNode, ConfigTree};
pub use project::{BuildLayout, BuildModel, Dependency, Model, Plugin, PluginExecution, Project, ProjectKey};
