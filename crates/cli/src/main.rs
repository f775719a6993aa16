//! testtriage CLI - Test Tier Classification and CI Routing
//!
//! This binary provides the command-line interface for the testtriage system.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use testtriage_core::catalog::TierCatalog;
use testtriage_core::config::Config;
use testtriage_core::error::Error;
use testtriage_core::tiers::Trigger;
use testtriage_matcher::{discover, RunPlan, TestCandidate, TierMatcher};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "testtriage")]
#[command(about = "Test tier classification and CI routing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tier table
    List {
        /// Only show the tier activated by this trigger
        #[arg(long)]
        trigger: Option<String>,
    },
    /// Classify candidate paths against the tier patterns
    Classify {
        /// Paths to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Walk the test root and classify every candidate found
    Discover {
        /// Root directory to walk (overrides configuration)
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Build the run plan for a CI trigger event
    Plan {
        /// Trigger event: pr_ready_label, pr_merged, nightly, weekly, pre_release
        #[arg(long)]
        trigger: String,

        /// Root directory to walk (overrides configuration)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load configuration and build the tier table once
    let config = load_config(cli.config.as_deref())?;
    let catalog = TierCatalog::from_config(&config.patterns)?;

    let json = cli.json || config.output.format == "json";

    match cli.command {
        Commands::List { trigger } => list_tiers(&catalog, trigger.as_deref(), json),
        Commands::Classify { paths } => classify_paths(&catalog, &paths, json),
        Commands::Discover { root } => discover_candidates(&catalog, &config, root, json),
        Commands::Plan { trigger, root } => plan_run(&catalog, &config, &trigger, root, json),
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "testtriage={level},testtriage_core={level},testtriage_matcher={level}"
        ))
        .with_writer(std::io::stderr)
        .init();
}

/// Load and validate configuration
///
/// Defaults to `testtriage.toml` in the working directory; a missing file
/// yields the built-in defaults with environment overrides applied.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or_else(|| Path::new("testtriage.toml"));
    let config = Config::from_file(path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    config.validate().context("validating configuration")?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Parse a trigger identifier, rejecting anything outside the defined set
fn parse_trigger(raw: &str) -> Result<Trigger> {
    Trigger::from_str(raw).map_err(|_| Error::unknown_trigger(raw).into())
}

/// Show the tier table, optionally narrowed to one trigger's tier
fn list_tiers(catalog: &TierCatalog, trigger: Option<&str>, json: bool) -> Result<()> {
    let tiers: Vec<_> = match trigger {
        Some(raw) => {
            let trigger = parse_trigger(raw)?;
            catalog.for_trigger(trigger).into_iter().collect()
        }
        None => catalog.all().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tiers)?);
    } else {
        output::print_tier_table(&tiers);
    }
    Ok(())
}

/// Classify the given paths
///
/// Unclassified paths are reported for manual triage; they do not fail the
/// run.
fn classify_paths(catalog: &TierCatalog, paths: &[PathBuf], json: bool) -> Result<()> {
    let matcher = TierMatcher::new(catalog)?;

    let candidates: Vec<TestCandidate> = paths
        .iter()
        .map(|path| TestCandidate {
            path: path.clone(),
            matched: matcher.classify(path),
        })
        .collect();

    let unclassified = candidates.iter().filter(|c| c.matched.is_none()).count();
    if unclassified > 0 {
        warn!(
            count = unclassified,
            "some paths matched no tier pattern; triage them manually"
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else {
        output::print_classification(&candidates);
    }
    Ok(())
}

/// Walk the test root and report every candidate
fn discover_candidates(
    catalog: &TierCatalog,
    config: &Config,
    root: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let matcher = TierMatcher::new(catalog)?;
    let mut discovery = config.discovery.clone();
    if let Some(root) = root {
        discovery.root = root;
    }

    info!(root = %discovery.root.display(), "discovering test candidates");
    let report = discover(&matcher, &discovery)
        .with_context(|| format!("walking {}", discovery.root.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report, catalog);
    }
    Ok(())
}

/// Build and print the run plan for a trigger event
fn plan_run(
    catalog: &TierCatalog,
    config: &Config,
    trigger: &str,
    root: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let trigger = parse_trigger(trigger)?;
    let matcher = TierMatcher::new(catalog)?;
    let mut discovery = config.discovery.clone();
    if let Some(root) = root {
        discovery.root = root;
    }

    let report = discover(&matcher, &discovery)
        .with_context(|| format!("walking {}", discovery.root.display()))?;
    let plan = RunPlan::build(catalog, trigger, &report)?;

    let unclassified = report.unclassified();
    if !unclassified.is_empty() {
        warn!(
            count = unclassified.len(),
            "unclassified candidates are excluded from the plan"
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        output::print_plan(&plan);
    }
    Ok(())
}
