//! Per-file create-or-repair state machine.
//!
//! ```text
//! Pending ──► ParentReady ──► Done(Created)
//!                  │
//!                  └──► Conflict ──► Done(AlreadyLinkedCorrectly | SkippedExists)
//!                           │
//!                           └──► Replacing ──► Done(ReplacedExisting)
//! ```
//!
//! Any step may fail with a [`LinkError`], which ends the machine in
//! `Failed`.  `Replacing` is only entered from `Conflict` and always ends the
//! machine, so a link is retried at most once.
//!
//! A destination beneath a directory that is itself a link inside the
//! destination root is never created or removed through that link: it ends
//! in `AlreadyLinkedCorrectly` when the link leads back to the source, and is
//! treated as an occupied destination otherwise.
use std::io;
use std::path::{Path, PathBuf};

use super::fs::{EntryKind, LinkFs, OsFs, paths_equal};
use super::{LinkLayout, LinkOutcome, LinkPlan, ReconcileOptions, plan_all};
use crate::error::LinkError;
use crate::resolve::ResolvedFile;

/// Reconcile `files` under `dest_root` against the real filesystem.
///
/// Files are processed in iteration order; pass an ordered collection (the
/// resolver's `BTreeSet`) for deterministic results.
pub fn reconcile<'a>(
    files: impl IntoIterator<Item = &'a ResolvedFile>,
    dest_root: &Path,
    layout: LinkLayout,
    options: ReconcileOptions,
) -> Vec<(LinkPlan, LinkOutcome)> {
    let plans = plan_all(files, dest_root, layout);
    reconcile_with(&OsFs, plans, dest_root, options)
}

/// Reconcile prepared plans through an arbitrary [`LinkFs`].
pub fn reconcile_with<F: LinkFs + ?Sized>(
    fs: &F,
    plans: Vec<LinkPlan>,
    dest_root: &Path,
    options: ReconcileOptions,
) -> Vec<(LinkPlan, LinkOutcome)> {
    let reconciler = Reconciler {
        fs,
        dest_root,
        options,
    };
    plans
        .into_iter()
        .map(|plan| {
            let outcome = reconciler.run(&plan);
            (plan, outcome)
        })
        .collect()
}

/// Intermediate states of one plan.
#[derive(Debug)]
enum LinkState {
    /// Nothing checked yet.
    Pending,
    /// Parent directory exists; the link can be attempted.
    ParentReady,
    /// The destination is occupied by an entry of this kind.
    Conflict(EntryKind),
    /// The occupant is being removed for the single retry.
    Replacing,
    /// Terminal.
    Done(LinkOutcome),
}

struct Reconciler<'a, F: LinkFs + ?Sized> {
    fs: &'a F,
    dest_root: &'a Path,
    options: ReconcileOptions,
}

impl<F: LinkFs + ?Sized> Reconciler<'_, F> {
    fn run(&self, plan: &LinkPlan) -> LinkOutcome {
        let mut state = LinkState::Pending;
        loop {
            state = match self.step(plan, state) {
                Ok(LinkState::Done(outcome)) => break outcome,
                Ok(next) => next,
                Err(e) => {
                    break LinkOutcome::Failed {
                        reason: e.to_string(),
                    };
                }
            };
        }
    }

    fn step(&self, plan: &LinkPlan, state: LinkState) -> Result<LinkState, LinkError> {
        let source = plan.source.absolute_path.as_path();
        let dest = plan.destination.as_path();
        match state {
            LinkState::Pending => {
                self.check_source(source)?;
                if let Some(linked) = self.linked_ancestor(dest)? {
                    return self.through_linked_ancestor(source, dest, linked);
                }
                self.ensure_parent(dest)?;
                Ok(LinkState::ParentReady)
            }
            LinkState::ParentReady => match self.fs.symlink(source, dest) {
                Ok(()) => Ok(LinkState::Done(LinkOutcome::Created)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    match self.inspect(dest)? {
                        Some(kind) => Ok(LinkState::Conflict(kind)),
                        None => Err(LinkError::Creation {
                            path: dest.to_path_buf(),
                            source: e,
                        }),
                    }
                }
                Err(e) => Err(LinkError::Creation {
                    path: dest.to_path_buf(),
                    source: e,
                }),
            },
            LinkState::Conflict(kind) => self.resolve_conflict(source, dest, kind),
            LinkState::Replacing => {
                self.fs.remove(dest).map_err(|e| LinkError::Remove {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
                self.fs
                    .symlink(source, dest)
                    .map_err(|e| LinkError::Creation {
                        path: dest.to_path_buf(),
                        source: e,
                    })?;
                Ok(LinkState::Done(LinkOutcome::ReplacedExisting))
            }
            done @ LinkState::Done(_) => Ok(done),
        }
    }

    fn resolve_conflict(
        &self,
        source: &Path,
        dest: &Path,
        kind: EntryKind,
    ) -> Result<LinkState, LinkError> {
        if kind == EntryKind::Symlink {
            let existing = self.fs.read_link(dest).map_err(|e| LinkError::Inspect {
                path: dest.to_path_buf(),
                source: e,
            })?;
            if paths_equal(&existing, source) {
                return Ok(LinkState::Done(LinkOutcome::AlreadyLinkedCorrectly));
            }
        }
        if !self.options.force_overwrite {
            return Ok(LinkState::Done(LinkOutcome::SkippedExists));
        }
        if kind == EntryKind::Directory {
            return Err(LinkError::DestinationIsDirectory(dest.to_path_buf()));
        }
        Ok(LinkState::Replacing)
    }

    fn check_source(&self, source: &Path) -> Result<(), LinkError> {
        match self.inspect(source)? {
            Some(_) => Ok(()),
            None => Err(LinkError::SourceVanished(source.to_path_buf())),
        }
    }

    /// First directory strictly inside the destination root, on the way to
    /// `dest`, that is a symlink.
    fn linked_ancestor(&self, dest: &Path) -> Result<Option<PathBuf>, LinkError> {
        let mut inner: Vec<&Path> = dest
            .ancestors()
            .skip(1)
            .take_while(|dir| *dir != self.dest_root && dir.starts_with(self.dest_root))
            .collect();
        inner.reverse();
        for dir in inner {
            match self.inspect(dir)? {
                Some(EntryKind::Symlink) => return Ok(Some(dir.to_path_buf())),
                None => break,
                Some(_) => {}
            }
        }
        Ok(None)
    }

    fn through_linked_ancestor(
        &self,
        source: &Path,
        dest: &Path,
        linked: PathBuf,
    ) -> Result<LinkState, LinkError> {
        let reaches_source = dest
            .parent()
            .zip(dest.file_name())
            .and_then(|(parent, name)| self.fs.canonicalize(parent).ok().map(|p| p.join(name)))
            .is_some_and(|resolved| paths_equal(&resolved, source));
        if reaches_source {
            Ok(LinkState::Done(LinkOutcome::AlreadyLinkedCorrectly))
        } else if !self.options.force_overwrite {
            Ok(LinkState::Done(LinkOutcome::SkippedExists))
        } else {
            Err(LinkError::DirectoryIsSymlink(linked))
        }
    }

    fn ensure_parent(&self, dest: &Path) -> Result<(), LinkError> {
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        match self.inspect(parent)? {
            Some(EntryKind::Directory | EntryKind::Symlink) => Ok(()),
            Some(EntryKind::File) => Err(LinkError::DirectoryCreation {
                path: parent.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            }),
            None if !self.options.create_missing_dirs => {
                Err(LinkError::DirectoryMissing(parent.to_path_buf()))
            }
            None => match self.fs.create_dir_all(parent) {
                Ok(()) => Ok(()),
                // Created by an earlier file or a concurrent process.
                Err(e)
                    if e.kind() == io::ErrorKind::AlreadyExists
                        && matches!(self.inspect(parent), Ok(Some(EntryKind::Directory))) =>
                {
                    Ok(())
                }
                Err(e) => Err(LinkError::DirectoryCreation {
                    path: parent.to_path_buf(),
                    source: e,
                }),
            },
        }
    }

    fn inspect(&self, path: &Path) -> Result<Option<EntryKind>, LinkError> {
        self.fs.entry_kind(path).map_err(|e| LinkError::Inspect {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
