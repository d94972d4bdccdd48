//! Digest items and the fingerprint they form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a fingerprinted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestType {
    /// The canonical effective configuration.
    Pom,
    /// An input file.
    File,
    /// A dependency contribution.
    Dependency,
    /// A sibling unit.
    Module,
    /// A resolved artifact file.
    Artifact,
}

impl DigestType {
    /// Returns the lowercase label used in reports and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestType::Pom => "pom",
            DigestType::File => "file",
            DigestType::Dependency => "dependency",
            DigestType::Module => "module",
            DigestType::Artifact => "artifact",
        }
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a file was classified as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    /// Known text content type.
    Yes,
    /// Known binary content type.
    No,
    /// Content type not recognized either way.
    Unknown,
}

impl TextKind {
    /// Returns the report label (`yes` / `no` / `unknown`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TextKind::Yes => "yes",
            TextKind::No => "no",
            TextKind::Unknown => "unknown",
        }
    }
}

/// Line-separator style of the first line break in a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eol {
    /// `\r\n`
    #[serde(rename = "CRLF")]
    Crlf,
    /// `\r` alone
    #[serde(rename = "CR")]
    Cr,
    /// `\n`
    #[serde(rename = "LF")]
    Lf,
    /// No line break found.
    #[serde(rename = "unknown")]
    Unknown,
}

impl Eol {
    /// Returns the report label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Eol::Crlf => "CRLF",
            Eol::Cr => "CR",
            Eol::Lf => "LF",
            Eol::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Eol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content details attached to `file` items.
///
/// `charset` and `eol` are only populated for content not classified binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDetails {
    /// Detected MIME type.
    pub content: Option<String>,
    /// Text classification.
    pub is_text: TextKind,
    /// Detected character encoding.
    pub charset: Option<String>,
    /// Detected line-separator style.
    pub eol: Option<Eol>,
}

impl ContentDetails {
    /// Details for content that could not be classified at all.
    pub fn unknown() -> Self {
        Self {
            content: None,
            is_text: TextKind::Unknown,
            charset: None,
            eol: None,
        }
    }
}

/// One fingerprinted input.
///
/// Items are immutable once built; the `with_*` methods consume and return
/// the item so details can only be attached while it is being constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestItem {
    #[serde(rename = "type")]
    item_type: DigestType,
    value: String,
    hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_text: Option<TextKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    charset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eol: Option<Eol>,
}

impl DigestItem {
    /// Creates an item with no optional details.
    pub fn new(item_type: DigestType, value: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            item_type,
            value: value.into(),
            hash: hash.into(),
            file_checksum: None,
            content: None,
            is_text: None,
            charset: None,
            eol: None,
        }
    }

    /// Attaches the checksum of the underlying file.
    pub fn with_file_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.file_checksum = Some(checksum.into());
        self
    }

    /// Attaches content classification details.
    pub fn with_content_details(mut self, details: ContentDetails) -> Self {
        self.content = details.content;
        self.is_text = Some(details.is_text);
        self.charset = details.charset;
        self.eol = details.eol;
        self
    }

    /// The input category.
    pub fn item_type(&self) -> DigestType {
        self.item_type
    }

    /// The normalized reference (relative path, dependency key, ...).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The item digest.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Checksum of the underlying file, if recorded.
    pub fn file_checksum(&self) -> Option<&str> {
        self.file_checksum.as_deref()
    }

    /// Detected MIME type.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Text classification.
    pub fn is_text(&self) -> Option<TextKind> {
        self.is_text
    }

    /// Detected character encoding.
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Detected line-separator style.
    pub fn eol(&self) -> Option<Eol> {
        self.eol
    }
}

/// The fingerprint of one unit.
///
/// Items are ordered pom first, then files in sorted path order, then
/// dependencies in sorted key order. `checksum` is the rolling digest over the
/// items in exactly that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsInputInfo {
    checksum: String,
    items: Vec<DigestItem>,
}

impl ProjectsInputInfo {
    /// Creates a fingerprint from its checksum and ordered items.
    pub fn new(checksum: impl Into<String>, items: Vec<DigestItem>) -> Self {
        Self {
            checksum: checksum.into(),
            items,
        }
    }

    /// The rolling checksum over all items.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// The ordered items.
    pub fn items(&self) -> &[DigestItem] {
        &self.items
    }

    /// The effective configuration item, if present.
    pub fn pom(&self) -> Option<&DigestItem> {
        self.items.iter().find(|i| i.item_type == DigestType::Pom)
    }

    /// Items of one category, in fingerprint order.
    pub fn items_of(&self, item_type: DigestType) -> impl Iterator<Item = &DigestItem> {
        self.items.iter().filter(move |i| i.item_type == item_type)
    }

    /// Finds an item by category and (whitespace-trimmed) value.
    pub fn find(&self, item_type: DigestType, value: &str) -> Option<&DigestItem> {
        self.items
            .iter()
            .find(|i| i.item_type == item_type && i.value.trim() == value)
    }
}
