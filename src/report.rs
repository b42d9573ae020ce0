//! Aggregation of per-file outcomes into a run report.
use std::fmt::Write as _;

use crate::link::{LinkOutcome, LinkPlan};

/// Counters for each terminal outcome.
///
/// # Examples
///
/// ```
/// use globlink::report::Summary;
///
/// let summary = Summary { created: 2, failed: 1, ..Summary::default() };
/// assert_eq!(
///     summary.to_string(),
///     "2 created, 0 already linked, 0 replaced, 0 skipped, 1 failed"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// New links.
    pub created: usize,
    /// Links that were already correct.
    pub already_linked: usize,
    /// Conflicting entries replaced.
    pub replaced: usize,
    /// Conflicts left alone.
    pub skipped: usize,
    /// Files that could not be linked.
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: &LinkOutcome) {
        match outcome {
            LinkOutcome::Created => self.created += 1,
            LinkOutcome::AlreadyLinkedCorrectly => self.already_linked += 1,
            LinkOutcome::ReplacedExisting => self.replaced += 1,
            LinkOutcome::SkippedExists => self.skipped += 1,
            LinkOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} already linked, {} replaced, {} skipped, {} failed",
            self.created, self.already_linked, self.replaced, self.skipped, self.failed
        )
    }
}

/// Every plan with its outcome, in processing order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    entries: Vec<(LinkPlan, LinkOutcome)>,
}

impl Report {
    /// Wrap reconciliation results.
    #[must_use]
    pub const fn new(entries: Vec<(LinkPlan, LinkOutcome)>) -> Self {
        Self { entries }
    }

    /// Count outcomes by kind.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for (_, outcome) in &self.entries {
            summary.record(outcome);
        }
        summary
    }

    /// Number of failed outcomes.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_failure()).count()
    }

    /// Return `true` if any outcome failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// One line per outcome: `<outcome>: <destination> -> <source>`,
    /// with the reason appended for failures.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(plan, outcome)| outcome_line(plan, outcome))
            .collect()
    }
}

/// Format a single outcome line.
#[must_use]
pub fn outcome_line(plan: &LinkPlan, outcome: &LinkOutcome) -> String {
    let mut line = format!(
        "{}: {} -> {}",
        outcome.label(),
        plan.destination.display(),
        plan.source.absolute_path.display()
    );
    if let LinkOutcome::Failed { reason } = outcome {
        let _ = write!(line, " ({reason})");
    }
    line
}
