//! Scanning of plugin configuration trees for input paths.
//!
//! Every accepted tag is examined depth-first. A tag carrying
//! `remote.cache.input="true"` is always walked, an empty value meaning the
//! unit's base directory; otherwise its value is walked only when it looks like
//! a filesystem path. The resolver never touches the
//! filesystem itself, it only issues walk requests to a [`PathWalker`].

use std::path::{Path, PathBuf};

use cairn_config::PluginScanConfig;
use cairn_model::ConfigNode;
use tracing::{debug, info};

use crate::error::ChecksumError;
use crate::walker::PathWalker;

/// Attribute marking a configuration tag as an input path.
pub const CACHE_INPUT_ATTRIBUTE: &str = "remote.cache.input";

/// Assembly descriptors may be referenced without their `.xml` extension.
const DESCRIPTOR_REF_TAG: &str = "descriptorRef";

const COMMON_LITERALS: &[&str] = &["true", "false", "utf-8", "null", "\\"];

const PACKAGE_PREFIXES: &[&str] = &["com.", "org.", "io.", "java.", "javax."];

const URL_PREFIXES: &[&str] = &[
    "http:",
    "https:",
    "scm:",
    "ssh:",
    "git:",
    "svn:",
    "cp:",
    "classpath:",
];

/// Returns the value as a path if it plausibly names one.
///
/// Blank values, common literals, globs, artifact coordinates, Java package
/// names, environment placeholders and URLs are rejected.
pub fn path_candidate(text: &str) -> Option<PathBuf> {
    let text = text.trim();
    let rejected = text.is_empty()
        || COMMON_LITERALS.iter().any(|l| text.eq_ignore_ascii_case(l))
        || text.contains('*')
        || text.contains('?')
        || (text.contains(':') && !text.contains(":\\"))
        || PACKAGE_PREFIXES.iter().any(|p| text.starts_with(p))
        || text.starts_with("${env.")
        || URL_PREFIXES.iter().any(|p| text.starts_with(p));
    if rejected {
        debug!(value = text, "skipped (blacklisted literal)");
        return None;
    }
    if text.contains('\0') {
        debug!(value = text, "invalid path");
        return None;
    }
    Some(PathBuf::from(text))
}

/// Issues walk requests for the path-like values of a configuration tree.
#[derive(Debug)]
pub struct ConfigScanResolver<'a> {
    scan: &'a PluginScanConfig,
    default_glob: &'a str,
}

impl<'a> ConfigScanResolver<'a> {
    /// Creates a resolver applying `scan`, with `default_glob` for tags
    /// without a glob override.
    pub fn new(scan: &'a PluginScanConfig, default_glob: &'a str) -> Self {
        Self { scan, default_glob }
    }

    /// Scans the children of a configuration root.
    pub fn scan(&self, root: &dyn ConfigNode, walker: &mut PathWalker) -> Result<(), ChecksumError> {
        for child in root.children() {
            self.scan_node(child, walker)?;
        }
        Ok(())
    }

    fn scan_node(&self, node: &dyn ConfigNode, walker: &mut PathWalker) -> Result<(), ChecksumError> {
        let tag = node.name();
        let value = node.value().map(str::trim).unwrap_or("");
        if !self.scan.accept(tag) {
            debug!(tag, value, "skipping tag (scan config)");
            return Ok(());
        }
        debug!(tag, value, "checking tag");

        for child in node.children() {
            self.scan_node(child, walker)?;
        }

        let properties = self.scan.tag_scan_properties(tag);
        let glob = properties
            .glob
            .as_deref()
            .filter(|g| !g.is_empty())
            .unwrap_or(self.default_glob);

        if node.attribute(CACHE_INPUT_ATTRIBUTE) == Some("true") {
            info!(tag, value, "found tag marked with {CACHE_INPUT_ATTRIBUTE}");
            walker.start_walk(Path::new(value), glob, properties.recursive)?;
        } else if let Some(candidate) = path_candidate(value) {
            walker.start_walk(&candidate, glob, properties.recursive)?;
            if tag == DESCRIPTOR_REF_TAG {
                let with_extension = format!("{value}.xml");
                walker.start_walk(Path::new(&with_extension), glob, properties.recursive)?;
            }
        }
        Ok(())
    }
}
