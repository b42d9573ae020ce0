// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed base tree and destination root so
// each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use globlink::link::{LinkLayout, LinkOutcome, LinkPlan, ReconcileOptions};
use globlink::resolve::{self, ResolveRequest};

/// An isolated base tree and destination root backed by a
/// [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory holding `base/` and `out/`.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with an empty `base/` directory.  The
    /// destination root is not created.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("base")).expect("create base dir");
        Self { root }
    }

    /// Directory searched for matches.
    pub fn base(&self) -> PathBuf {
        self.root.path().join("base")
    }

    /// Canonical form of [`Self::base`], as link targets are written.
    pub fn canonical_base(&self) -> PathBuf {
        dunce::canonicalize(self.base()).expect("canonicalize base dir")
    }

    /// Destination root.
    pub fn out(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Resolve `tokens` and reconcile every match into [`Self::out`].
    pub fn link(
        &self,
        tokens: &[&str],
        recursive: bool,
        layout: LinkLayout,
        options: ReconcileOptions,
    ) -> Vec<(LinkPlan, LinkOutcome)> {
        let request = ResolveRequest {
            base_dir: self.base(),
            tokens: tokens.iter().map(ToString::to_string).collect(),
            recursive,
            ..ResolveRequest::default()
        };
        let resolution = resolve::resolve(&request).expect("resolve tokens");
        globlink::link::reconcile(&resolution.files, &self.out(), layout, options)
    }

    /// Target of the symlink at `out/<rel>`.
    pub fn target_of(&self, rel: &str) -> PathBuf {
        std::fs::read_link(self.out().join(rel)).expect("read link")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with an empty base tree.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Create `base/<rel>` with its path as content.
    pub fn with_file(self, rel: &str) -> Self {
        let path = self.ctx.base().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create file parent");
        }
        std::fs::write(&path, rel).expect("write source file");
        self
    }

    /// Create the empty directory `base/<rel>`.
    pub fn with_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ctx.base().join(rel)).expect("create source dir");
        self
    }

    /// Create the destination root up front.
    pub fn with_out(self) -> Self {
        std::fs::create_dir_all(self.ctx.out()).expect("create out dir");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// Outcome labels paired with the destination relative to `out`.
pub fn outcomes(ctx: &IntegrationTestContext, results: &[(LinkPlan, LinkOutcome)]) -> Vec<String> {
    results
        .iter()
        .map(|(plan, outcome)| {
            let rel = plan
                .destination
                .strip_prefix(ctx.out())
                .unwrap_or(&plan.destination);
            format!("{}: {}", outcome.label(), slashed(rel))
        })
        .collect()
}

fn slashed(path: &Path) -> String {
    resolve::pattern::to_slash(path)
}
