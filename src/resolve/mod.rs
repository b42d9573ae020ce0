//! Pattern resolution: expand glob tokens under a base directory into the
//! deduplicated set of matching paths.
//!
//! Resolution never mutates the filesystem.  The base directory is walked
//! once; every entry is tested against every token, then the union is run
//! through the include/exclude filter and, optionally, empty directories are
//! pruned.  Dot-entries are not walked at all unless some token names one.

pub mod pattern;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ConfigError;
use pattern::{PathFilter, Token, is_hidden, to_slash};

/// Input to [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Directory the tokens are expanded against.
    pub base_dir: PathBuf,
    /// Glob tokens, in the order given.
    pub tokens: Vec<String>,
    /// Match at any depth instead of only direct children.
    pub recursive: bool,
    /// Patterns that re-admit excluded paths.
    pub include: Vec<String>,
    /// Patterns that remove paths from the match set.
    pub exclude: Vec<String>,
    /// Drop matched directories that contain no files.
    pub prune_empty_dirs: bool,
}

/// A path selected by the resolver.
///
/// Ordering is by absolute path, which for a single base directory is the
/// same as ordering by relative path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolvedFile {
    /// Absolute (canonical) path of the entry.
    pub absolute_path: PathBuf,
    /// Path relative to the base directory.
    pub relative_path: PathBuf,
}

impl ResolvedFile {
    /// Directory part of the relative path (empty for direct children).
    #[must_use]
    pub fn relative_dir(&self) -> &Path {
        self.relative_path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Number of entries a single token matched before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatches {
    /// The token as given.
    pub token: String,
    /// Entries it matched.
    pub count: usize,
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Canonical base directory.
    pub base_dir: PathBuf,
    /// The resolved set, in stable order.
    pub files: BTreeSet<ResolvedFile>,
    /// Per-token match counts, in token order.
    pub token_matches: Vec<TokenMatches>,
    /// Entries below the base directory that could not be read.
    pub walk_errors: Vec<String>,
}

impl Resolution {
    /// Return `true` if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Expand `request.tokens` under `request.base_dir`.
///
/// An empty token list yields an empty set.
///
/// # Errors
///
/// Returns [`ConfigError`] if the base directory does not exist, is not a
/// directory, cannot be canonicalised, or if any pattern is malformed.
pub fn resolve(request: &ResolveRequest) -> Result<Resolution, ConfigError> {
    let base_dir = canonical_base(&request.base_dir)?;
    let tokens = request
        .tokens
        .iter()
        .map(|t| Token::new(t, request.recursive))
        .collect::<Result<Vec<_>, _>>()?;
    let filter = PathFilter::new(&request.include, &request.exclude)?;

    let mut resolution = Resolution {
        token_matches: tokens
            .iter()
            .map(|t| TokenMatches {
                token: t.as_str().to_string(),
                count: 0,
            })
            .collect(),
        base_dir,
        ..Resolution::default()
    };
    if tokens.is_empty() {
        return Ok(resolution);
    }

    let mut walker = WalkDir::new(&resolution.base_dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    if let Some(depth) = walk_depth(&tokens) {
        walker = walker.max_depth(depth);
    }

    let walk_hidden = tokens.iter().any(Token::admits_hidden);
    let entries = walker.into_iter().filter_entry(|e| {
        walk_hidden || e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy())
    });

    let mut matched: BTreeSet<ResolvedFile> = BTreeSet::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                resolution.walk_errors.push(e.to_string());
                continue;
            }
        };
        let Ok(relative) = entry.path().strip_prefix(&resolution.base_dir) else {
            continue;
        };
        let slashed = to_slash(relative);

        let mut hit = false;
        for (token, counter) in tokens.iter().zip(resolution.token_matches.iter_mut()) {
            if token.is_match(&slashed) {
                counter.count += 1;
                hit = true;
            }
        }
        if !hit {
            continue;
        }

        matched.insert(ResolvedFile {
            absolute_path: entry.path().to_path_buf(),
            relative_path: relative.to_path_buf(),
        });
    }

    resolution.files = matched
        .into_iter()
        .filter(|f| filter.admits(&to_slash(&f.relative_path)))
        .filter(|f| !request.prune_empty_dirs || !is_empty_dir(&f.absolute_path))
        .collect();
    Ok(resolution)
}

/// Validate and canonicalise the base directory.
fn canonical_base(base: &Path) -> Result<PathBuf, ConfigError> {
    let meta = match std::fs::metadata(base) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::BaseDirNotFound(base.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: base.to_path_buf(),
                source,
            });
        }
    };
    if !meta.is_dir() {
        return Err(ConfigError::BaseDirNotADirectory(base.to_path_buf()));
    }
    dunce::canonicalize(base).map_err(|source| ConfigError::Io {
        path: base.to_path_buf(),
        source,
    })
}

/// Deepest walk level any token needs, or `None` for an unbounded walk.
fn walk_depth(tokens: &[Token]) -> Option<usize> {
    tokens
        .iter()
        .map(Token::max_depth)
        .try_fold(0, |deepest, depth| depth.map(|d| deepest.max(d)))
}

/// A real directory with no non-directory entry anywhere beneath it.
///
/// Anything other than a real directory is never considered empty.
fn is_empty_dir(path: &Path) -> bool {
    let is_real_dir = path.symlink_metadata().is_ok_and(|m| m.is_dir());
    if !is_real_dir {
        return false;
    }
    !WalkDir::new(path)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .any(|e| !e.file_type().is_dir())
}
