//! The authoritative tier table
//!
//! `TierCatalog` holds the static definitions of the six testing levels in
//! escalation order. It is built once at process start and never mutated;
//! lookups are pure reads, safe from concurrent callers.

use crate::config::PatternsConfig;
use crate::error::{Error, Result};
use crate::tiers::{Hardware, Suite, Tier, TierId, TierPattern, Trigger};
use std::str::FromStr;
use std::time::Duration;

/// Static mapping from tier identifier to its metadata
#[derive(Debug, Clone)]
pub struct TierCatalog {
    /// Tiers in escalation order: Common, L1, L2, L3, L4, L5
    tiers: Vec<Tier>,
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TierCatalog {
    /// Builds the built-in tier table
    pub fn builtin() -> Self {
        let tiers = vec![
            Tier {
                id: TierId::Common,
                scope: "Shared fixtures and helpers used by every level".to_string(),
                time_budget: None,
                patterns: Vec::new(),
                trigger: None,
                hardware: None,
                markers: Vec::new(),
            },
            Tier {
                id: TierId::L1,
                scope: "Component unit tests gating PR readiness".to_string(),
                time_budget: Some(Duration::from_secs(15 * 60)),
                patterns: vec![TierPattern::new("tests/*/test_*.py", Suite::Component)],
                trigger: Some(Trigger::PrReadyLabel),
                hardware: Some(Hardware::Cpu),
                markers: vec!["core_model".to_string(), "cpu".to_string()],
            },
            Tier {
                id: TierId::L2,
                scope: "Core-model end-to-end tests run on merge".to_string(),
                time_budget: Some(Duration::from_secs(20 * 60)),
                patterns: vec![
                    TierPattern::new(
                        "tests/e2e/online_serving/test_*.py",
                        Suite::OnlineServing,
                    ),
                    TierPattern::new(
                        "tests/e2e/offline_inference/test_*.py",
                        Suite::OfflineInference,
                    ),
                ],
                trigger: Some(Trigger::PrMerged),
                hardware: Some(Hardware::Gpu),
                markers: vec!["core_model".to_string(), "gpu".to_string()],
            },
            Tier {
                id: TierId::L3,
                scope: "Expansion end-to-end coverage for the same models".to_string(),
                time_budget: Some(Duration::from_secs(30 * 60)),
                patterns: vec![
                    TierPattern::new(
                        "tests/e2e/online_serving/test_*_expansion.py",
                        Suite::Expansion,
                    ),
                    TierPattern::new(
                        "tests/e2e/offline_inference/test_*_expansion.py",
                        Suite::Expansion,
                    ),
                ],
                trigger: Some(Trigger::PrMerged),
                hardware: Some(Hardware::Gpu),
                markers: vec!["core_model".to_string(), "gpu".to_string()],
            },
            Tier {
                id: TierId::L4,
                scope: "Nightly performance runs and documentation example tests".to_string(),
                time_budget: Some(Duration::from_secs(3 * 60 * 60)),
                patterns: vec![
                    TierPattern::new("tests/e2e/perf/nightly.json", Suite::PerfConfig),
                    TierPattern::new(
                        "tests/example/online_serving/test_*.py",
                        Suite::DocExample,
                    ),
                    TierPattern::new(
                        "tests/example/offline_inference/test_*.py",
                        Suite::DocExample,
                    ),
                ],
                trigger: Some(Trigger::Nightly),
                hardware: Some(Hardware::Gpu),
                markers: vec!["gpu".to_string()],
            },
            Tier {
                id: TierId::L5,
                scope: "Weekly stability and reliability runs".to_string(),
                time_budget: None,
                patterns: vec![
                    TierPattern::new("tests/e2e/stability/weekly.json", Suite::Stability),
                    TierPattern::new(
                        "tests/e2e/reliability/test_*.py",
                        Suite::Reliability,
                    ),
                ],
                trigger: Some(Trigger::Weekly),
                hardware: Some(Hardware::Gpu),
                markers: vec!["gpu".to_string()],
            },
        ];

        Self { tiers }
    }

    /// Builds the tier table extended with extra patterns from configuration
    ///
    /// Extra patterns extend the built-in set, they never replace it. Fails
    /// with `Error::UnknownTier` on an unrecognized tier key and with
    /// `Error::Pattern` on a glob that does not compile.
    pub fn from_config(patterns: &PatternsConfig) -> Result<Self> {
        let mut catalog = Self::builtin();

        for (key, globs) in &patterns.extra {
            let id = TierId::from_str(key).map_err(|_| Error::unknown_tier(key.clone()))?;
            for raw in globs {
                // Bad globs fail at startup, not on first classification
                glob::Pattern::new(raw)?;
                let tier = catalog
                    .tiers
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or_else(|| Error::unknown_tier(key.clone()))?;
                let suite = default_suite_for(id);
                tier.patterns.push(TierPattern::new(raw.clone(), suite));
            }
        }

        Ok(catalog)
    }

    /// Returns the tier for the given identifier
    pub fn get(&self, id: TierId) -> &Tier {
        // The table always holds all six variants.
        self.tiers
            .iter()
            .find(|t| t.id == id)
            .unwrap_or_else(|| unreachable!("tier table missing {id}"))
    }

    /// Returns the tier for a string identifier
    ///
    /// Fails with `Error::UnknownTier` for anything outside the six defined
    /// values.
    pub fn get_by_name(&self, name: &str) -> Result<&Tier> {
        let id = TierId::from_str(name).map_err(|_| Error::unknown_tier(name))?;
        Ok(self.get(id))
    }

    /// All tiers in escalation order
    pub fn all(&self) -> &[Tier] {
        &self.tiers
    }

    /// The tier a CI event activates
    ///
    /// When two tiers share an event (L2 and L3 both run on merge), the
    /// highest one is returned; the lower tiers are pulled in through
    /// [`TierCatalog::included_tiers`].
    pub fn for_trigger(&self, trigger: Trigger) -> Option<&Tier> {
        self.tiers
            .iter()
            .rev()
            .find(|t| t.trigger == Some(trigger))
    }

    /// Superset expansion: the routable tiers at or below `id`
    ///
    /// Later tiers run everything the earlier ones guarantee, so a nightly
    /// L4 run includes L1 through L3. `Common` is never included.
    pub fn included_tiers(&self, id: TierId) -> Vec<TierId> {
        self.tiers
            .iter()
            .filter(|t| t.is_routable() && t.id <= id)
            .map(|t| t.id)
            .collect()
    }
}

/// Suite label applied to config-supplied patterns
///
/// Configuration keys name a tier, not a suite; extra patterns take the
/// tier's broadest suite.
fn default_suite_for(id: TierId) -> Suite {
    match id {
        TierId::Common | TierId::L1 => Suite::Component,
        TierId::L2 => Suite::OnlineServing,
        TierId::L3 => Suite::Expansion,
        TierId::L4 => Suite::DocExample,
        TierId::L5 => Suite::Reliability,
    }
}
