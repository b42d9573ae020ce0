//! Command-line surface and its conversion into resolver and reconciler input.

use std::path::PathBuf;

use clap::Parser;

use crate::link::{LinkLayout, ReconcileOptions};
use crate::resolve::ResolveRequest;

/// Create symlinks in a destination directory for files matched by glob
/// tokens under a base directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "globlink",
    about = "Create symlinks of files matching glob tokens into a destination directory",
    version = option_env!("GLOBLINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Base directory to search for files
    #[arg(short = 'b', long = "base-dir", value_name = "DIR")]
    pub base_dir: PathBuf,

    /// Glob token to match file names against (repeatable)
    #[arg(short = 't', long = "token", value_name = "PATTERN", num_args = 1.., required = true)]
    pub tokens: Vec<String>,

    /// Destination directory to create the symlinks in
    #[arg(short = 'd', long = "dest-dir", value_name = "DIR")]
    pub dest_dir: PathBuf,

    /// Search subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Re-admit paths matching this pattern even if excluded (repeatable)
    #[arg(long, value_name = "PATTERN", num_args = 1..)]
    pub include: Vec<String>,

    /// Drop paths matching this pattern (repeatable)
    #[arg(long, value_name = "PATTERN", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Create missing destination directories
    #[arg(long)]
    pub create: bool,

    /// Replace existing destination entries that point elsewhere
    #[arg(short, long)]
    pub force: bool,

    /// Link every file directly into the destination directory
    #[arg(long)]
    pub flatten: bool,

    /// Omit matched directories that contain no files
    #[arg(long)]
    pub prune: bool,

    /// Print a count of outcomes when done
    #[arg(long)]
    pub summary: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolver input described by these arguments.
    #[must_use]
    pub fn resolve_request(&self) -> ResolveRequest {
        ResolveRequest {
            base_dir: self.base_dir.clone(),
            tokens: self.tokens.clone(),
            recursive: self.recursive,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            prune_empty_dirs: self.prune,
        }
    }

    /// Reconciler policy described by these arguments.
    #[must_use]
    pub const fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            create_missing_dirs: self.create,
            force_overwrite: self.force,
            verbose: self.verbose,
        }
    }

    /// Destination layout described by these arguments.
    #[must_use]
    pub const fn layout(&self) -> LinkLayout {
        LinkLayout::from_flatten(self.flatten)
    }
}
