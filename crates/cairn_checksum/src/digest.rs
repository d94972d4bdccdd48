//! Construction of digest items.
//!
//! Each constructor folds the item's content into the unit checksum and
//! returns the item carrying its individual digest.

use std::path::Path;

use cairn_common::HashChecksum;
use cairn_model::{DigestItem, DigestType};

use crate::content::{classify, guess_content_type};
use crate::error::ChecksumError;

/// Hashes the canonical effective configuration.
pub fn pom_item(checksum: &mut HashChecksum, effective_pom: &str) -> Result<DigestItem, ChecksumError> {
    let hash = checksum.update(effective_pom.as_bytes())?;
    Ok(DigestItem::new(DigestType::Pom, effective_pom, hash))
}

/// Hashes an input file and classifies its content.
///
/// An unreadable file is fatal; classification problems are not.
pub fn file_item(checksum: &mut HashChecksum, base_dir: &Path, file: &Path) -> Result<DigestItem, ChecksumError> {
    let bytes = std::fs::read(file).map_err(|e| ChecksumError::io(file, e))?;
    let hash = checksum.update(&bytes)?;
    let details = classify(guess_content_type(file).as_deref(), &bytes);
    Ok(DigestItem::new(DigestType::File, file_value(base_dir, file), hash).with_content_details(details))
}

/// Folds a pre-computed dependency digest.
pub fn dependency_item(checksum: &mut HashChecksum, key: &str, hash: &str) -> Result<DigestItem, ChecksumError> {
    let hash = checksum.update_hash(hash)?;
    Ok(DigestItem::new(DigestType::Dependency, key, hash))
}

/// Reference recorded for a file: its path relative to `base_dir` with `/`
/// separators, or the slash-normalized absolute path for files outside it.
pub fn file_value(base_dir: &Path, file: &Path) -> String {
    let path = file.strip_prefix(base_dir).unwrap_or(file);
    path.to_string_lossy().replace('\\', "/")
}
