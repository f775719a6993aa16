//! Run planning for CI trigger events
//!
//! A trigger event activates one tier; the superset rule expands it to the
//! full ladder below it (a nightly L4 run also runs L1 through L3). The plan
//! pairs each activated tier with the files discovery classified into it and
//! the marker expression the external runner filters by.

use crate::discovery::DiscoveryReport;
use serde::Serialize;
use std::path::PathBuf;
use testtriage_core::catalog::TierCatalog;
use testtriage_core::error::{Error, Result};
use testtriage_core::tiers::{Hardware, TierId, Trigger};
use tracing::debug;

/// One tier's slice of a run plan
#[derive(Debug, Clone, Serialize)]
pub struct TierRun {
    /// Tier to run
    pub tier: TierId,
    /// Hardware class the tier requires
    pub hardware: Option<Hardware>,
    /// Wall-clock budget in minutes, if the policy fixes one
    pub time_budget_minutes: Option<u64>,
    /// Marker expression for the external runner, e.g. `core_model and cpu`
    pub marker_expr: Option<String>,
    /// Files discovery classified into this tier
    pub files: Vec<PathBuf>,
}

/// Everything a CI job needs to execute one trigger event
#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    /// The trigger event being planned
    pub trigger: Trigger,
    /// Activated tiers in escalation order
    pub tiers: Vec<TierRun>,
}

impl RunPlan {
    /// Builds the plan for a trigger event
    ///
    /// `pre_release` has no tier of its own: it activates the full ladder.
    pub fn build(
        catalog: &TierCatalog,
        trigger: Trigger,
        report: &DiscoveryReport,
    ) -> Result<Self> {
        let target = match trigger {
            Trigger::PreRelease => TierId::L5,
            _ => catalog
                .for_trigger(trigger)
                .map(|t| t.id)
                .ok_or_else(|| {
                    Error::config(format!("no tier is bound to trigger '{trigger}'"))
                })?,
        };

        let tiers = catalog
            .included_tiers(target)
            .into_iter()
            .map(|id| {
                let tier = catalog.get(id);
                TierRun {
                    tier: id,
                    hardware: tier.hardware,
                    time_budget_minutes: tier.time_budget.map(|d| d.as_secs() / 60),
                    marker_expr: tier.marker_expr(),
                    files: report
                        .files_for(id)
                        .into_iter()
                        .map(PathBuf::from)
                        .collect(),
                }
            })
            .collect::<Vec<_>>();

        debug!(trigger = %trigger, target = %target, tiers = tiers.len(), "run plan built");

        Ok(Self { trigger, tiers })
    }

    /// Total number of files across all activated tiers
    pub fn file_count(&self) -> usize {
        self.tiers.iter().map(|t| t.files.len()).sum()
    }

    /// Identifiers of the activated tiers, in escalation order
    pub fn tier_ids(&self) -> Vec<TierId> {
        self.tiers.iter().map(|t| t.tier).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{DiscoveryReport, TestCandidate};
    use pretty_assertions::assert_eq;
    use testtriage_core::tiers::{Suite, TierMatch};

    fn report_with(path: &str, tier: TierId, suite: Suite, pattern: &str) -> DiscoveryReport {
        DiscoveryReport {
            candidates: vec![TestCandidate {
                path: PathBuf::from(path),
                matched: Some(TierMatch {
                    tier,
                    suite,
                    pattern: pattern.to_string(),
                }),
            }],
        }
    }

    #[test]
    fn test_pr_ready_label_plans_l1_only() {
        let catalog = TierCatalog::builtin();
        let report = report_with(
            "tests/engine/test_arg_utils.py",
            TierId::L1,
            Suite::Component,
            "tests/*/test_*.py",
        );

        let plan = RunPlan::build(&catalog, Trigger::PrReadyLabel, &report).unwrap();
        assert_eq!(plan.tier_ids(), vec![TierId::L1]);
        assert_eq!(plan.file_count(), 1);
        assert_eq!(
            plan.tiers[0].marker_expr.as_deref(),
            Some("core_model and cpu")
        );
        assert_eq!(plan.tiers[0].time_budget_minutes, Some(15));
    }

    #[test]
    fn test_merge_plans_l1_through_l3() {
        let catalog = TierCatalog::builtin();
        let plan =
            RunPlan::build(&catalog, Trigger::PrMerged, &DiscoveryReport::default()).unwrap();
        assert_eq!(plan.tier_ids(), vec![TierId::L1, TierId::L2, TierId::L3]);
    }

    #[test]
    fn test_nightly_plans_l1_through_l4() {
        let catalog = TierCatalog::builtin();
        let plan =
            RunPlan::build(&catalog, Trigger::Nightly, &DiscoveryReport::default()).unwrap();
        assert_eq!(
            plan.tier_ids(),
            vec![TierId::L1, TierId::L2, TierId::L3, TierId::L4]
        );
        assert_eq!(plan.tiers.last().unwrap().time_budget_minutes, Some(180));
    }

    #[test]
    fn test_pre_release_plans_full_ladder() {
        let catalog = TierCatalog::builtin();
        let plan =
            RunPlan::build(&catalog, Trigger::PreRelease, &DiscoveryReport::default()).unwrap();
        assert_eq!(
            plan.tier_ids(),
            vec![TierId::L1, TierId::L2, TierId::L3, TierId::L4, TierId::L5]
        );
        // No fixed budget for the weekly tier
        assert_eq!(plan.tiers.last().unwrap().time_budget_minutes, None);
    }

    #[test]
    fn test_common_is_never_planned() {
        let catalog = TierCatalog::builtin();
        for trigger in [
            Trigger::PrReadyLabel,
            Trigger::PrMerged,
            Trigger::Nightly,
            Trigger::Weekly,
            Trigger::PreRelease,
        ] {
            let plan = RunPlan::build(&catalog, trigger, &DiscoveryReport::default()).unwrap();
            assert!(!plan.tier_ids().contains(&TierId::Common));
        }
    }

    #[test]
    fn test_plan_serializes_wire_identifiers() {
        let catalog = TierCatalog::builtin();
        let plan =
            RunPlan::build(&catalog, Trigger::Nightly, &DiscoveryReport::default()).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["trigger"], "nightly");
        assert_eq!(json["tiers"][0]["tier"], "l1");
        assert_eq!(json["tiers"][0]["hardware"], "cpu");
    }
}
