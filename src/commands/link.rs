//! The `globlink` link command: resolve, reconcile, report.

use anyhow::Result;

use crate::cli::Cli;
use crate::link;
use crate::logging::Log;
use crate::report::Report;
use crate::resolve;

/// Run the link command: resolve tokens, then reconcile every match.
///
/// Verbose output is a stage header per phase plus debug lines: the
/// effective configuration, one line per token with its match count, and
/// one line per outcome.  Unreadable entries met during the walk are
/// warnings.
///
/// # Errors
///
/// Returns an error if the base directory does not exist or a pattern is
/// malformed.  Per-file failures are never errors here; they are recorded
/// in the returned [`Report`].
pub fn run(args: &Cli, log: &dyn Log) -> Result<Report> {
    let request = args.resolve_request();
    let options = args.reconcile_options();
    let layout = args.layout();

    log.debug(&format!("base directory: {}", args.base_dir.display()));
    log.debug(&format!("tokens: {}", args.tokens.join(", ")));
    log.debug(&format!("destination directory: {}", args.dest_dir.display()));
    log.debug(&format!(
        "recursive: {}, flatten: {}, prune: {}, create: {}, force: {}",
        args.recursive, args.flatten, args.prune, args.create, args.force
    ));

    if args.verbose {
        log.stage("Resolving tokens");
    }
    let resolution = resolve::resolve(&request)?;
    for matches in &resolution.token_matches {
        log.debug(&format!(
            "found {} match(es) for token '{}'",
            matches.count, matches.token
        ));
    }
    if resolution.is_empty() {
        log.debug("no files matched");
    }
    for error in &resolution.walk_errors {
        log.warn(&format!("skipped unreadable entry: {error}"));
    }

    if args.verbose {
        log.stage("Linking");
    }

    let report = Report::new(link::reconcile(
        &resolution.files,
        &args.dest_dir,
        layout,
        options,
    ));
    if options.verbose {
        for line in report.lines() {
            log.debug(&line);
        }
    }
    Ok(report)
}
