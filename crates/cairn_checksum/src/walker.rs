//! Deterministic, filter-aware collection of input files.
//!
//! A [`PathWalker`] is created per unit calculation. Walk requests are
//! deduplicated by [`WalkKey`], hidden and excluded subtrees are pruned, and
//! the collected files are returned in an order that depends only on their
//! paths, never on directory enumeration order or host path separators.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ChecksumError;

/// Identity of a directory walk.
///
/// Two walks with equal keys produce the same files, so the second is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalkKey {
    /// Absolute, normalized directory path.
    pub path: PathBuf,
    /// File-name glob.
    pub glob: String,
    /// Whether subdirectories are walked.
    pub recursive: bool,
}

impl WalkKey {
    /// Creates a walk key.
    pub fn new(path: impl Into<PathBuf>, glob: impl Into<String>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            glob: glob.into(),
            recursive,
        }
    }
}

/// Collects input files for one unit.
#[derive(Debug)]
pub struct PathWalker {
    base_dir: PathBuf,
    excluded: Vec<PathBuf>,
    visited: HashSet<WalkKey>,
    files: Vec<PathBuf>,
    matchers: HashMap<String, GlobMatcher>,
    walks: usize,
}

impl PathWalker {
    /// Creates a walker resolving relative paths against `base_dir`.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: absolute_path(base_dir),
            excluded: Vec::new(),
            visited: HashSet::new(),
            files: Vec::new(),
            matchers: HashMap::new(),
            walks: 0,
        }
    }

    /// The absolute, normalized base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Excludes a path and everything below it. Walked files sharing the
    /// excluded path's file name are skipped as well.
    pub fn exclude(&mut self, path: impl AsRef<Path>) {
        let resolved = self.resolve(path.as_ref());
        if !self.excluded.contains(&resolved) {
            self.excluded.push(resolved);
        }
    }

    /// The excluded paths, absolute and normalized.
    pub fn excluded(&self) -> &[PathBuf] {
        &self.excluded
    }

    /// Returns `true` if `path` is at or below an excluded path.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        self.excluded.iter().any(|e| normalized.starts_with(e))
    }

    /// Returns `true` if a walked file must be left out: it is excluded, or
    /// its file name equals that of an excluded path.
    fn is_skipped_file(&self, path: &Path) -> bool {
        self.is_excluded(path)
            || path
                .file_name()
                .is_some_and(|name| self.excluded.iter().any(|e| e.file_name() == Some(name)))
    }

    /// Number of directory walks performed so far.
    pub fn walks(&self) -> usize {
        self.walks
    }

    /// Files collected so far, in collection order.
    pub fn collected(&self) -> &[PathBuf] {
        &self.files
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            normalize_path(path)
        } else {
            normalize_path(&self.base_dir.join(path))
        }
    }

    /// Walks `candidate`, collecting files whose names match `glob`.
    ///
    /// Relative candidates resolve against the base directory. Missing paths
    /// and repeated walks are no-ops. A regular file is collected directly
    /// unless excluded. Walking an ancestor of the base directory is never
    /// recursive.
    pub fn start_walk(&mut self, candidate: &Path, glob: &str, recursive: bool) -> Result<(), ChecksumError> {
        let normalized = self.resolve(candidate);
        let mut key = WalkKey::new(normalized.clone(), glob, recursive);
        if self.visited.contains(&key) || !normalized.exists() {
            return Ok(());
        }

        if normalized.is_dir() {
            if self.base_dir.starts_with(&normalized) {
                key.recursive = false;
            }
            self.walk_dir(&key)?;
            self.visited.insert(key);
        } else if !self.is_skipped_file(&normalized) {
            debug!(path = %normalized.display(), "adding input file");
            self.files.push(normalized);
        }
        Ok(())
    }

    fn matcher(&mut self, glob: &str) -> Result<GlobMatcher, ChecksumError> {
        if let Some(matcher) = self.matchers.get(glob) {
            return Ok(matcher.clone());
        }
        let matcher = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|e| ChecksumError::InvalidGlob {
                glob: glob.to_string(),
                reason: e.to_string(),
            })?
            .compile_matcher();
        self.matchers.insert(glob.to_string(), matcher.clone());
        Ok(matcher)
    }

    fn walk_dir(&mut self, key: &WalkKey) -> Result<(), ChecksumError> {
        self.walks += 1;
        let matcher = self.matcher(&key.glob)?;
        let max_depth = if key.recursive { usize::MAX } else { 1 };
        let mut entries = WalkDir::new(&key.path).max_depth(max_depth).into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| key.path.clone(), Path::to_path_buf);
                ChecksumError::io(path, e.into())
            })?;
            let path = entry.path();

            if entry.file_type().is_dir() {
                if entry.depth() > 0 && !key.recursive {
                    continue;
                }
                match self.prune_reason(path, key) {
                    Some(reason) => {
                        debug!(path = %path.display(), reason, "skipping subtree");
                        entries.skip_current_dir();
                    }
                    None => debug!(path = %path.display(), "visiting subtree"),
                }
                continue;
            }

            if !matcher.is_match(entry.file_name()) || !path.is_file() || is_hidden(path) {
                continue;
            }
            if self.is_skipped_file(path) {
                debug!(path = %path.display(), "skipping excluded file");
                continue;
            }
            self.files.push(normalize_path(path));
        }
        Ok(())
    }

    fn prune_reason(&self, dir: &Path, key: &WalkKey) -> Option<&'static str> {
        if is_hidden(dir) {
            Some("hidden")
        } else if self.is_excluded(dir) {
            Some("blacklisted")
        } else if self
            .visited
            .contains(&WalkKey::new(normalize_path(dir), key.glob.as_str(), key.recursive))
        {
            Some("visited")
        } else {
            None
        }
    }

    /// Consumes the walker and returns the collected files, deduplicated and
    /// sorted by [`sort_key`].
    pub fn into_sorted_files(self) -> Vec<PathBuf> {
        sort_and_dedup(self.files)
    }
}

/// Ordering key of a path: separators normalized to `/`, case folded.
pub fn sort_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

/// Deduplicates and orders paths by [`sort_key`]. The first of several paths
/// with equal keys is kept.
pub fn sort_and_dedup(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut sorted = BTreeMap::new();
    for path in paths {
        sorted.entry(sort_key(&path)).or_insert(path);
    }
    sorted.into_values().collect()
}

/// Makes `path` absolute against the working directory and normalizes it.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_path(path);
    }
    let joined = std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf());
    normalize_path(&joined)
}

/// Lexically normalizes a path, resolving `.` and `..` without touching the
/// filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Returns `true` for dotfiles and, on Windows, files with the hidden attribute.
pub fn is_hidden(path: &Path) -> bool {
    let dotfile = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'));
    dotfile || has_hidden_attribute(path)
}

#[cfg(windows)]
fn has_hidden_attribute(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    std::fs::metadata(path)
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn has_hidden_attribute(_path: &Path) -> bool {
    false
}
