//! Domain-specific error types for globlink.
//!
//! Library code returns typed errors built with [`thiserror`]; the binary
//! converts them to [`anyhow::Error`] at the CLI boundary via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError: fatal, raised before any filesystem mutation
//! LinkError:   per-file, always folded into a `LinkOutcome::Failed`
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before any link is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The base directory does not exist.
    #[error("base directory not found: {}", .0.display())]
    BaseDirNotFound(PathBuf),

    /// The base directory exists but is not a directory.
    #[error("base directory is not a directory: {}", .0.display())]
    BaseDirNotADirectory(PathBuf),

    /// A token, include or exclude pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given on the command line.
        pattern: String,
        /// Why the glob compiler rejected it.
        reason: String,
    },

    /// An I/O error occurred while inspecting the base directory.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while reconciling a single link.
///
/// None of these abort the batch: the reconciler turns each one into a
/// failed outcome for the file it belongs to.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The destination's parent directory is absent and creation is disabled.
    #[error("destination directory missing: {}", .0.display())]
    DirectoryMissing(PathBuf),

    /// The destination's parent directory could not be created.
    #[error("cannot create directory {}: {source}", .path.display())]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A directory between the destination root and the link is a symlink.
    #[error("destination directory is a symlink: {}", .0.display())]
    DirectoryIsSymlink(PathBuf),

    /// The source file disappeared after resolution.
    #[error("source vanished: {}", .0.display())]
    SourceVanished(PathBuf),

    /// The destination is a real directory, which is never removed.
    #[error("destination is a directory: {}", .0.display())]
    DestinationIsDirectory(PathBuf),

    /// The existing destination entry could not be inspected.
    #[error("cannot inspect {}: {source}", .path.display())]
    Inspect {
        /// Path being inspected.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The existing destination entry could not be removed.
    #[error("cannot remove existing {}: {source}", .path.display())]
    Remove {
        /// Path that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The filesystem refused to create the link.
    #[error("cannot create link {}: {source}", .path.display())]
    Creation {
        /// Link path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
