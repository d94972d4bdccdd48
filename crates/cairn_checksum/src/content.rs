//! Best-effort content classification of input files.
//!
//! Classification only enriches `file` digest items for diagnostics; it never
//! affects the checksum and never fails a calculation.

use std::path::Path;

use cairn_model::{ContentDetails, Eol, TextKind};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

/// Number of leading bytes inspected for charset and line endings.
const CHARSET_SAMPLE_LIMIT: usize = 16 * 1024;

const TEXT_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/sql",
    "application/rtf",
    "application/x-sh",
];

const BINARY_PREFIXES: &[&str] = &["image/", "audio/", "video/", "font/"];

const BINARY_TYPES: &[&str] = &[
    "application/octet-stream",
    "application/zip",
    "application/gzip",
    "application/x-gzip",
    "application/x-tar",
    "application/x-bzip2",
    "application/x-xz",
    "application/x-7z-compressed",
    "application/x-rar-compressed",
    "application/vnd.rar",
    "application/java-archive",
    "application/pdf",
    "application/msword",
    "application/vnd.ms-excel",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

/// Guesses the content type of a file from its name.
pub fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first_raw().map(str::to_string)
}

/// Returns `true` for content types known to be text.
pub fn is_text(content_type: &str) -> bool {
    content_type.starts_with("text/")
        || content_type.contains("+json")
        || content_type.contains("+xml")
        || TEXT_TYPES.contains(&content_type)
}

/// Returns `true` for content types known to be binary.
pub fn is_binary(content_type: &str) -> bool {
    BINARY_PREFIXES.iter().any(|p| content_type.starts_with(p))
        || content_type.contains("+zip")
        || content_type.contains("+gzip")
        || BINARY_TYPES.contains(&content_type)
}

/// Classifies file content.
///
/// `charset` and `eol` are only filled in when the content is not known to be
/// binary. Pure ASCII content reports no charset. Only the leading bytes are
/// decoded.
pub fn classify(content_type: Option<&str>, bytes: &[u8]) -> ContentDetails {
    let content_type = content_type.map(|c| c.trim().to_ascii_lowercase());
    let (text, binary) = match content_type.as_deref() {
        Some(ct) => (is_text(ct), is_binary(ct)),
        None => (false, false),
    };
    let is_text = if text {
        TextKind::Yes
    } else if binary {
        TextKind::No
    } else {
        TextKind::Unknown
    };
    let mut details = ContentDetails {
        content: content_type,
        is_text,
        charset: None,
        eol: None,
    };
    if binary {
        return details;
    }

    let encoding = detect_charset(bytes);
    details.charset = encoding.map(|e| e.name().to_string());
    let sample = &bytes[..bytes.len().min(CHARSET_SAMPLE_LIMIT)];
    let (decoded, _, had_errors) = encoding.unwrap_or(UTF_8).decode(sample);
    if had_errors {
        debug!(
            charset = encoding.unwrap_or(UTF_8).name(),
            "content contains malformed sequences"
        );
    }
    details.eol = Some(detect_eol(&decoded));
    details
}

/// Detects the character encoding from the leading bytes.
///
/// Returns `None` for empty or pure ASCII content, where any ASCII-compatible
/// charset decodes identically.
pub fn detect_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }
    let sample = &bytes[..bytes.len().min(CHARSET_SAMPLE_LIMIT)];
    if sample.is_ascii() {
        return None;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    Some(detector.guess(None, true))
}

/// Classifies the first line break of `text`.
pub fn detect_eol(text: &str) -> Eol {
    let Some(pos) = text.find(|c: char| c == '\r' || c == '\n') else {
        return Eol::Unknown;
    };
    let rest = &text.as_bytes()[pos..];
    match rest {
        [b'\r', b'\n', ..] => Eol::Crlf,
        [b'\r', ..] => Eol::Cr,
        _ => Eol::Lf,
    }
}
