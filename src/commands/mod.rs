//! Top-level command orchestration.
pub mod link;

use anyhow::Result;

use crate::logging::Log;
use crate::report::Report;

/// Report the run's totals and bail if any file failed.
///
/// The summary line is printed when `print_summary` is set and always in
/// verbose mode (where it is logged at debug level).
///
/// # Errors
///
/// Returns an error carrying the failure count if one or more links failed.
pub fn finish(report: &Report, log: &dyn Log, print_summary: bool) -> Result<()> {
    let summary = report.summary();
    if print_summary {
        log.info(&summary.to_string());
    } else {
        log.debug(&summary.to_string());
    }

    let count = report.failure_count();
    if count > 0 {
        anyhow::bail!("{count} link(s) failed");
    }
    Ok(())
}
