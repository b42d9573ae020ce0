//! Glob pattern matching on `/`-separated relative paths.
//!
//! Matching is a pure function of `(pattern, relative path)` and never
//! touches the filesystem.  Two flavours are used:
//!
//! - **Tokens** select candidate files.  `*` and `?` do not cross a `/`, so
//!   a non-recursive token only matches at the depth it names.  Recursive
//!   tokens are anchored under `**/` so they match at any depth.  A name
//!   starting with `.` is only matched by a pattern component that itself
//!   starts with `.`; `*`, `?` and `**` never reach into dot-entries.
//! - **Filters** (`--include` / `--exclude`) use `globset` defaults, where a
//!   bare `*.log` matches anywhere in the tree.

use std::path::{Component, Path};

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::error::ConfigError;

/// Convert a relative path to the `/`-separated form patterns match against.
///
/// Only normal components are kept; `.` and prefixes are dropped.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Return `true` if `pattern` matches `relative`, with `*` not crossing `/`
/// and wildcards skipping dot-entries.
///
/// An invalid pattern never matches.
///
/// # Examples
///
/// ```
/// use globlink::resolve::pattern::matches;
///
/// assert!(matches("*.txt", "notes.txt"));
/// assert!(!matches("*.txt", "a/notes.txt"));
/// assert!(matches("**/*.txt", "a/b/notes.txt"));
/// assert!(!matches("*.txt", ".notes.txt"));
/// assert!(matches(".*", ".notes.txt"));
/// ```
#[must_use]
pub fn matches(pattern: &str, relative: &str) -> bool {
    Token::new(pattern, false).is_ok_and(|t| t.is_match(relative))
}

/// A compiled token: the pattern as given plus its matcher.
#[derive(Debug, Clone)]
pub struct Token {
    source: String,
    matcher: GlobMatcher,
    parts: Vec<String>,
    depth: Option<usize>,
}

impl Token {
    /// Compile `token`, anchoring it under `**/` when `recursive` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the glob is malformed.
    pub fn new(token: &str, recursive: bool) -> Result<Self, ConfigError> {
        let trimmed = token.trim_start_matches("./");
        let anchored = if recursive && !trimmed.starts_with("**/") {
            format!("**/{trimmed}")
        } else {
            trimmed.to_string()
        };
        let matcher = compile_token(&anchored).map_err(|e| ConfigError::InvalidPattern {
            pattern: token.to_string(),
            reason: e.to_string(),
        })?;
        let parts: Vec<String> = anchored.split('/').map(ToString::to_string).collect();
        let depth = (!anchored.contains("**")).then_some(parts.len());
        Ok(Self {
            source: token.to_string(),
            matcher,
            parts,
            depth,
        })
    }

    /// The token as originally given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Deepest level (in path components) this token can match, or `None`
    /// when it can match at any depth.
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.depth
    }

    /// Return `true` if some component of the token names a dot-entry, so
    /// dot-entries have to be walked at all.
    #[must_use]
    pub fn admits_hidden(&self) -> bool {
        self.parts.iter().any(|p| is_hidden(p))
    }

    /// Return `true` if the token matches the `/`-separated relative path.
    #[must_use]
    pub fn is_match(&self, relative: &str) -> bool {
        self.matcher.is_match(relative) && self.hidden_parts_named(relative)
    }

    /// Every dot-component of `relative` lines up with a pattern component
    /// that starts with `.`.  Components before the first `**` line up from
    /// the front, those after the last `**` from the back, and whatever the
    /// `**` run absorbs must not be hidden.
    fn hidden_parts_named(&self, relative: &str) -> bool {
        let path: Vec<&str> = relative.split('/').collect();
        let head = self.parts.iter().take_while(|p| *p != "**").count();
        let front_ok = path
            .iter()
            .zip(self.parts.iter().take(head))
            .all(|(c, p)| !is_hidden(c) || is_hidden(p));
        if head == self.parts.len() {
            return front_ok;
        }

        let tail = self.parts.iter().rev().take_while(|p| *p != "**").count();
        let back_ok = path
            .iter()
            .rev()
            .zip(self.parts.iter().rev().take(tail))
            .all(|(c, p)| !is_hidden(c) || is_hidden(p));
        let middle_named = self
            .parts
            .iter()
            .skip(head)
            .take(self.parts.len().saturating_sub(head + tail))
            .any(|p| is_hidden(p));
        let middle_ok = middle_named
            || path
                .iter()
                .skip(head)
                .take(path.len().saturating_sub(head + tail))
                .all(|c| !is_hidden(c));
        front_ok && back_ok && middle_ok
    }
}

/// Return `true` for a dot-prefixed name or pattern component.
#[must_use]
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn compile_token(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
}

/// Include/exclude filter applied after all tokens have been expanded.
///
/// A path is admitted unless it matches an exclude pattern, and an include
/// pattern always re-admits it: include beats exclude.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    /// Compile include and exclude patterns.  Empty lists disable that side.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] naming the first malformed
    /// pattern.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
        })
    }

    /// Return `true` if `relative` survives the filter.
    #[must_use]
    pub fn admits(&self, relative: &str) -> bool {
        let excluded = self.exclude.as_ref().is_some_and(|s| s.is_match(relative));
        if !excluded {
            return true;
        }
        self.include.as_ref().is_some_and(|s| s.is_match(relative))
    }
}

fn build_set(patterns: &[String]) -> Result<Option<GlobSet>, ConfigError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: patterns.join(", "),
            reason: e.to_string(),
        })
}
