//! Test candidate discovery
//!
//! Walks a test root, filters out ignored paths, selects candidate files
//! (pytest modules and JSON suite configs), and classifies each candidate.
//! Unclassified candidates are collected for manual triage; they never fail
//! the walk. Filesystem errors propagate to the caller unmodified.

use crate::matcher::TierMatcher;
use glob::Pattern;
use serde::Serialize;
use std::path::{Path, PathBuf};
use testtriage_core::config::DiscoveryConfig;
use testtriage_core::error::Result;
use testtriage_core::tiers::{TierId, TierMatch};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A discovered test file or test-config entry
///
/// Produced per run and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCandidate {
    /// Path relative to the scanned root, `/`-separated
    pub path: PathBuf,
    /// Classification result, if any pattern matched
    pub matched: Option<TierMatch>,
}

/// Outcome of a discovery walk
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    /// Every candidate found under the root, classified where possible
    pub candidates: Vec<TestCandidate>,
}

impl DiscoveryReport {
    /// Candidates that matched no tier pattern
    pub fn unclassified(&self) -> Vec<&Path> {
        self.candidates
            .iter()
            .filter(|c| c.matched.is_none())
            .map(|c| c.path.as_path())
            .collect()
    }

    /// Paths classified into the given tier
    pub fn files_for(&self, tier: TierId) -> Vec<&Path> {
        self.candidates
            .iter()
            .filter(|c| c.matched.as_ref().is_some_and(|m| m.tier == tier))
            .map(|c| c.path.as_path())
            .collect()
    }

    /// Number of classified candidates
    pub fn classified_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.matched.is_some()).count()
    }
}

/// Filters walk entries against ignore patterns
#[derive(Debug, Clone)]
struct IgnoreFilter {
    patterns: Vec<Pattern>,
}

impl IgnoreFilter {
    fn from_patterns(patterns: &[String]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns: compiled })
    }

    fn should_ignore(&self, rel: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(rel))
    }
}

/// Whether a relative path names a test candidate
///
/// Candidates are pytest modules (`test_*.py`) and JSON suite configs.
/// Everything else, `conftest.py` included, is skipped without comment.
fn is_candidate(rel: &str) -> bool {
    let file_name = rel.rsplit('/').next().unwrap_or(rel);
    (file_name.starts_with("test_") && file_name.ends_with(".py"))
        || file_name.ends_with(".json")
}

/// Walks the configured root and classifies every candidate found
pub fn discover(matcher: &TierMatcher, config: &DiscoveryConfig) -> Result<DiscoveryReport> {
    let filter = IgnoreFilter::from_patterns(&config.ignore_patterns)?;
    let root = config.root.as_path();

    let mut report = DiscoveryReport::default();

    for entry in WalkDir::new(root).follow_links(config.follow_symlinks) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path());
        let rel_str = rel.to_string_lossy().replace('\\', "/");

        if filter.should_ignore(&rel_str) {
            trace!(path = %rel_str, "ignored during discovery");
            continue;
        }
        if !is_candidate(&rel_str) {
            continue;
        }

        let rel_path = PathBuf::from(&rel_str);
        let matched = matcher.classify(&rel_path);
        report.candidates.push(TestCandidate {
            path: rel_path,
            matched,
        });
    }

    debug!(
        total = report.candidates.len(),
        classified = report.classified_count(),
        unclassified = report.unclassified().len(),
        "discovery walk complete"
    );

    Ok(report)
}
