//! Link planning and reconciliation.
//!
//! A [`LinkPlan`] pairs a resolved source with the destination its link
//! should occupy.  [`reconcile`] drives each plan through the create-or-repair
//! sequence and returns a [`LinkOutcome`] per plan; one failing file never
//! stops the rest.

pub mod fs;
mod reconcile;

pub use reconcile::{reconcile, reconcile_with};

use std::fmt;
use std::path::{Path, PathBuf};

use crate::resolve::ResolvedFile;

/// How destination paths are derived from source paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkLayout {
    /// `dest/<relative dir>/<file name>`: mirror the base directory tree.
    #[default]
    Preserve,
    /// `dest/<file name>`: drop every intermediate directory.
    Flatten,
}

impl LinkLayout {
    /// Layout for a `--flatten` flag value.
    #[must_use]
    pub const fn from_flatten(flatten: bool) -> Self {
        if flatten { Self::Flatten } else { Self::Preserve }
    }
}

/// Policy flags for reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOptions {
    /// Create missing destination directories.
    pub create_missing_dirs: bool,
    /// Replace an existing destination that points elsewhere.
    pub force_overwrite: bool,
    /// Emit one line per outcome.
    pub verbose: bool,
}

/// A resolved source and the path its link should occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPlan {
    /// What the link points at.
    pub source: ResolvedFile,
    /// Where the link is created.
    pub destination: PathBuf,
}

impl LinkPlan {
    /// Compute the destination for `source` under `dest_root`.
    #[must_use]
    pub fn new(source: ResolvedFile, dest_root: &Path, layout: LinkLayout) -> Self {
        let destination = destination_for(&source, dest_root, layout);
        Self {
            source,
            destination,
        }
    }
}

/// Destination path of `source` under `dest_root` for the given layout.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use globlink::link::{LinkLayout, destination_for};
/// use globlink::resolve::ResolvedFile;
///
/// let file = ResolvedFile {
///     absolute_path: PathBuf::from("/base/a/b/y.txt"),
///     relative_path: PathBuf::from("a/b/y.txt"),
/// };
/// let out = Path::new("out");
/// assert_eq!(destination_for(&file, out, LinkLayout::Preserve), Path::new("out/a/b/y.txt"));
/// assert_eq!(destination_for(&file, out, LinkLayout::Flatten), Path::new("out/y.txt"));
/// ```
#[must_use]
pub fn destination_for(source: &ResolvedFile, dest_root: &Path, layout: LinkLayout) -> PathBuf {
    let name = source
        .relative_path
        .file_name()
        .or_else(|| source.absolute_path.file_name())
        .unwrap_or_default();
    match layout {
        LinkLayout::Flatten => dest_root.join(name),
        LinkLayout::Preserve => dest_root.join(source.relative_dir()).join(name),
    }
}

/// Build plans for every resolved file, in the resolver's stable order.
#[must_use]
pub fn plan_all<'a>(
    files: impl IntoIterator<Item = &'a ResolvedFile>,
    dest_root: &Path,
    layout: LinkLayout,
) -> Vec<LinkPlan> {
    files
        .into_iter()
        .map(|f| LinkPlan::new(f.clone(), dest_root, layout))
        .collect()
}

/// Terminal state of one plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new link was created.
    Created,
    /// The destination already pointed at the source.
    AlreadyLinkedCorrectly,
    /// A conflicting entry was removed and the link recreated.
    ReplacedExisting,
    /// The destination was taken and overwriting is disabled.
    SkippedExists,
    /// The link could not be established.
    Failed {
        /// Why.
        reason: String,
    },
}

impl LinkOutcome {
    /// Return `true` for [`LinkOutcome::Failed`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Short lowercase label used in reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AlreadyLinkedCorrectly => "already linked",
            Self::ReplacedExisting => "replaced",
            Self::SkippedExists => "skipped (exists)",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "failed ({reason})"),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn file(rel: &str) -> ResolvedFile {
        ResolvedFile {
            absolute_path: Path::new("/base").join(rel),
            relative_path: PathBuf::from(rel),
        }
    }

    #[test]
    fn preserve_keeps_relative_directories() {
        let dest = destination_for(&file("a/b/y.txt"), Path::new("out"), LinkLayout::Preserve);
        assert_eq!(dest, PathBuf::from("out/a/b/y.txt"));
    }

    #[test]
    fn preserve_places_direct_children_at_root() {
        let dest = destination_for(&file("x.txt"), Path::new("out"), LinkLayout::Preserve);
        assert_eq!(dest, PathBuf::from("out/x.txt"));
    }

    #[test]
    fn flatten_drops_directories() {
        let dest = destination_for(&file("a/b/y.txt"), Path::new("out"), LinkLayout::Flatten);
        assert_eq!(dest, PathBuf::from("out/y.txt"));
    }

    #[test]
    fn layout_from_flag() {
        assert_eq!(LinkLayout::from_flatten(true), LinkLayout::Flatten);
        assert_eq!(LinkLayout::from_flatten(false), LinkLayout::Preserve);
        assert_eq!(LinkLayout::default(), LinkLayout::Preserve);
    }

    #[test]
    fn plan_all_keeps_input_order() {
        let files = [file("a/x.txt"), file("b/y.txt")];
        let plans = plan_all(&files, Path::new("out"), LinkLayout::Flatten);
        let dests: Vec<_> = plans.iter().map(|p| p.destination.clone()).collect();
        assert_eq!(
            dests,
            vec![PathBuf::from("out/x.txt"), PathBuf::from("out/y.txt")]
        );
    }

    #[test]
    fn outcome_display_includes_failure_reason() {
        let failed = LinkOutcome::Failed {
            reason: "permission denied".to_string(),
        };
        assert!(failed.is_failure());
        assert_eq!(failed.to_string(), "failed (permission denied)");
        assert_eq!(LinkOutcome::Created.to_string(), "created");
        assert!(!LinkOutcome::SkippedExists.is_failure());
    }
}
