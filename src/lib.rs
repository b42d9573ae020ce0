//! Glob-driven symlink creation.
//!
//! Finds files under a base directory whose paths match one or more glob
//! tokens and mirrors them into a destination directory as symbolic links.
//! Existing entries are reconciled: correct links are left alone, conflicts
//! are skipped or replaced under `--force`, and every file gets exactly one
//! outcome.
//!
//! The public API is organised into four layers:
//!
//! - **[`resolve`]**: walk the base directory and collect matching files
//! - **[`link`]**: plan destinations and reconcile each one against the filesystem
//! - **[`report`]**: aggregate outcomes into lines and a summary
//! - **[`commands`]**: orchestrate a run from parsed [`cli`] arguments
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod link;
pub mod logging;
pub mod report;
pub mod resolve;
