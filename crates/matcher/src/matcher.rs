//! Tier classification for test candidate paths
//!
//! This module compiles the catalog's directory patterns once and classifies
//! candidate paths against them. Classification is a pure function of the
//! compiled table and the path.

use glob::{MatchOptions, Pattern};
use std::path::Path;
use testtriage_core::catalog::TierCatalog;
use testtriage_core::error::{Error, Result};
use testtriage_core::tiers::{Suite, TierId, TierMatch};
use tracing::trace;

/// Glob options for tier patterns
///
/// `*` must not cross `/`: the component-level pattern `tests/*/test_*.py`
/// may not swallow nested end-to-end paths.
const TIER_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One compiled tier pattern
#[derive(Debug, Clone)]
struct CompiledPattern {
    tier: TierId,
    suite: Suite,
    raw: String,
    pattern: Pattern,
    /// Length of the literal prefix before the first glob metacharacter
    specificity: usize,
}

/// Classifies candidate paths against every tier's patterns
///
/// Immutable after construction; safe to share across threads.
#[derive(Debug, Clone)]
pub struct TierMatcher {
    compiled: Vec<CompiledPattern>,
}

impl TierMatcher {
    /// Compiles the catalog's patterns
    pub fn new(catalog: &TierCatalog) -> Result<Self> {
        let mut compiled = Vec::new();

        for tier in catalog.all() {
            for entry in &tier.patterns {
                let normalized = normalize(&entry.glob);
                let pattern = Pattern::new(&normalized)?;
                compiled.push(CompiledPattern {
                    tier: tier.id,
                    suite: entry.suite,
                    specificity: literal_prefix_len(&normalized),
                    raw: normalized,
                    pattern,
                });
            }
        }

        Ok(Self { compiled })
    }

    /// Classifies a candidate path, returning the best match if any
    ///
    /// All matching patterns are considered; the most specific one (longest
    /// literal prefix) wins, and ties go to the higher tier since later
    /// tiers are supersets of earlier ones. Well-formed pattern sets are
    /// disjoint by suffix, so the tie-break only decides overlaps such as
    /// `test_*.py` also covering `test_*_expansion.py`.
    pub fn classify(&self, path: &Path) -> Option<TierMatch> {
        let candidate = normalize(&path.to_string_lossy());

        let best = self
            .compiled
            .iter()
            .filter(|c| c.pattern.matches_with(&candidate, TIER_MATCH_OPTIONS))
            .max_by_key(|c| (c.specificity, c.tier.rank()))?;

        trace!(
            path = %candidate,
            tier = %best.tier,
            pattern = %best.raw,
            "classified candidate"
        );

        Some(TierMatch {
            tier: best.tier,
            suite: best.suite,
            pattern: best.raw.clone(),
        })
    }

    /// Classifies a candidate path, failing if no pattern matches
    ///
    /// The error is advisory: callers report the path for manual triage and
    /// continue.
    pub fn classify_required(&self, path: &Path) -> Result<TierMatch> {
        self.classify(path)
            .ok_or_else(|| Error::unclassified(path))
    }

    /// Number of compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.compiled.len()
    }
}

/// Normalizes a path or pattern to a `/`-separated relative string
fn normalize(raw: &str) -> String {
    let s = raw.replace('\\', "/");
    let s = s.strip_prefix("./").unwrap_or(&s);
    s.trim_start_matches('/').to_string()
}

/// Length of the literal prefix before the first glob metacharacter
fn literal_prefix_len(pattern: &str) -> usize {
    pattern
        .find(['*', '?', '['])
        .unwrap_or(pattern.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matcher() -> TierMatcher {
        TierMatcher::new(&TierCatalog::builtin()).expect("built-in patterns compile")
    }

    #[test]
    fn test_component_test_is_l1() {
        let m = matcher();
        let found = m.classify(Path::new("tests/engine/test_arg_utils.py")).unwrap();
        assert_eq!(found.tier, TierId::L1);
        assert_eq!(found.suite, Suite::Component);
    }

    #[test]
    fn test_online_serving_test_is_l2() {
        let m = matcher();
        let found = m
            .classify(Path::new("tests/e2e/online_serving/test_qwen3_omni.py"))
            .unwrap();
        assert_eq!(found.tier, TierId::L2);
        assert_eq!(found.suite, Suite::OnlineServing);
    }

    #[test]
    fn test_expansion_suffix_wins_over_l2() {
        let m = matcher();
        let found = m
            .classify(Path::new(
                "tests/e2e/online_serving/test_qwen3_omni_expansion.py",
            ))
            .unwrap();
        assert_eq!(found.tier, TierId::L3);
        assert_eq!(found.suite, Suite::Expansion);
    }

    #[test]
    fn test_stability_config_is_l5() {
        let m = matcher();
        let found = m.classify(Path::new("tests/e2e/stability/weekly.json")).unwrap();
        assert_eq!(found.tier, TierId::L5);
        assert_eq!(found.suite, Suite::Stability);
    }

    #[test]
    fn test_perf_config_is_l4() {
        let m = matcher();
        let found = m.classify(Path::new("tests/e2e/perf/nightly.json")).unwrap();
        assert_eq!(found.tier, TierId::L4);
        assert_eq!(found.suite, Suite::PerfConfig);
    }

    #[test]
    fn test_doc_example_is_l4() {
        let m = matcher();
        let found = m
            .classify(Path::new("tests/example/offline_inference/test_qwen2_5_omni.py"))
            .unwrap();
        assert_eq!(found.tier, TierId::L4);
        assert_eq!(found.suite, Suite::DocExample);
    }

    #[test]
    fn test_unrelated_path_has_no_match() {
        let m = matcher();
        assert_eq!(m.classify(Path::new("tests/foo/bar.txt")), None);

        let err = m
            .classify_required(Path::new("tests/foo/bar.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::Unclassified { .. }));
    }

    #[test]
    fn test_component_pattern_does_not_cross_directories() {
        let m = matcher();
        // Three path components below tests/ must never look like a
        // component unit test.
        let found = m
            .classify(Path::new("tests/e2e/reliability/test_qwen3_omni.py"))
            .unwrap();
        assert_eq!(found.tier, TierId::L5);
    }

    #[test]
    fn test_leading_slash_and_dot_are_normalized() {
        let m = matcher();
        for path in ["/tests/engine/test_arg_utils.py", "./tests/engine/test_arg_utils.py"] {
            let found = m.classify(Path::new(path)).unwrap();
            assert_eq!(found.tier, TierId::L1);
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        let m = matcher();
        let path = Path::new("tests/e2e/offline_inference/test_qwen3_omni.py");
        assert_eq!(m.classify(path), m.classify(path));
    }

    #[test]
    fn test_literal_prefix_len() {
        assert_eq!(literal_prefix_len("tests/e2e/perf/nightly.json"), 27);
        assert_eq!(literal_prefix_len("tests/*/test_*.py"), 6);
        assert_eq!(literal_prefix_len("[a]bc"), 0);
    }

    #[test]
    fn test_specificity_tie_prefers_higher_tier() {
        // The built-in L2 and L3 online-serving patterns share a literal
        // prefix and both match an expansion filename.
        let m = matcher();
        let found = m
            .classify(Path::new("tests/e2e/offline_inference/test_a_expansion.py"))
            .unwrap();
        assert_eq!(found.tier, TierId::L3);
    }
}
