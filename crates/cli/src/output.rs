//! Human-readable rendering for CLI results
//!
//! JSON output is handled at the command layer with serde; this module only
//! formats the human-facing views.

use std::time::Duration;
use testtriage_core::catalog::TierCatalog;
use testtriage_core::tiers::Tier;
use testtriage_matcher::{DiscoveryReport, RunPlan, TestCandidate};

/// Print the tier table
pub fn print_tier_table(tiers: &[&Tier]) {
    if tiers.is_empty() {
        println!("No tiers match the selection.");
        return;
    }

    println!(
        "{:<8} {:<14} {:<5} {:<8} {:<24} SCOPE",
        "TIER", "TRIGGER", "HW", "BUDGET", "MARKERS"
    );
    for tier in tiers {
        println!(
            "{:<8} {:<14} {:<5} {:<8} {:<24} {}",
            tier.id.to_string(),
            tier.trigger.map_or_else(|| "-".to_string(), |t| t.to_string()),
            tier.hardware.map_or_else(|| "-".to_string(), |h| h.to_string()),
            render_budget(tier.time_budget),
            tier.marker_expr().unwrap_or_else(|| "-".to_string()),
            tier.scope,
        );
    }
}

/// Print classification results, one line per path
pub fn print_classification(candidates: &[TestCandidate]) {
    for candidate in candidates {
        match &candidate.matched {
            Some(m) => println!(
                "{} -> {} ({} suite, pattern {})",
                candidate.path.display(),
                m.tier,
                m.suite,
                m.pattern
            ),
            None => println!("{} -> unclassified", candidate.path.display()),
        }
    }
}

/// Print a discovery report: per-tier counts, then unclassified paths
pub fn print_report(report: &DiscoveryReport, catalog: &TierCatalog) {
    println!(
        "Discovered {} candidates ({} classified)",
        report.candidates.len(),
        report.classified_count()
    );

    for tier in catalog.all() {
        let files = report.files_for(tier.id);
        if files.is_empty() {
            continue;
        }
        println!("\n{} ({} files):", tier.id, files.len());
        for file in files {
            println!("  {}", file.display());
        }
    }

    let unclassified = report.unclassified();
    if !unclassified.is_empty() {
        println!("\nUnclassified ({} files, triage manually):", unclassified.len());
        for file in unclassified {
            println!("  {}", file.display());
        }
    }
}

/// Print a run plan, one section per activated tier
pub fn print_plan(plan: &RunPlan) {
    println!(
        "Run plan for '{}': {} tiers, {} files",
        plan.trigger,
        plan.tiers.len(),
        plan.file_count()
    );

    for run in &plan.tiers {
        let budget = run
            .time_budget_minutes
            .map_or_else(|| "no budget".to_string(), |m| format!("{m} min"));
        let hardware = run
            .hardware
            .map_or_else(|| "-".to_string(), |h| h.to_string());

        println!("\n{} [{hardware}, {budget}]", run.tier);
        if let Some(expr) = &run.marker_expr {
            println!("  runner filter: -m '{expr}'");
        }
        if run.files.is_empty() {
            println!("  (no files discovered)");
        }
        for file in &run.files {
            println!("  {}", file.display());
        }
    }
}

/// Render a time budget as a compact human string
fn render_budget(budget: Option<Duration>) -> String {
    match budget {
        None => "-".to_string(),
        Some(d) => {
            let mins = d.as_secs() / 60;
            if mins % 60 == 0 && mins >= 60 {
                format!("{}h", mins / 60)
            } else {
                format!("{mins}m")
            }
        }
    }
}
