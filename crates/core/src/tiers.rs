//! Tier reference data for the testing hierarchy
//!
//! This module defines the immutable value types describing the five
//! testing levels (plus the non-routable `Common` bucket): identifiers,
//! CI trigger events, hardware classes, and per-tier directory patterns.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{Display, EnumIter, EnumString};

/// Identifier of a testing level
///
/// Declaration order is the escalation order: later tiers are supersets of
/// the guarantees of earlier ones. `Common` holds shared fixtures and is
/// never routed to a CI event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum TierId {
    Common,
    L1,
    L2,
    L3,
    L4,
    L5,
}

impl TierId {
    /// Position in the escalation order (Common is 0)
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// CI event that causes a tier's tests to run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Trigger {
    PrReadyLabel,
    PrMerged,
    Nightly,
    Weekly,
    PreRelease,
}

/// Hardware class a tier's tests require
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Hardware {
    Cpu,
    Gpu,
}

/// Sub-kind of a tier's test suite
///
/// Distinguishes the suites that share a tier, e.g. the L5 stability
/// config from the L5 reliability tests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Suite {
    Component,
    OnlineServing,
    OfflineInference,
    Expansion,
    PerfConfig,
    DocExample,
    Stability,
    Reliability,
}

/// One directory glob pattern and the suite it selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPattern {
    /// Glob pattern relative to the repository root, `/`-separated
    pub glob: String,
    /// Suite the pattern belongs to
    pub suite: Suite,
}

impl TierPattern {
    pub fn new(glob: impl Into<String>, suite: Suite) -> Self {
        Self {
            glob: glob.into(),
            suite,
        }
    }
}

/// One testing level
///
/// Immutable reference data: built once at startup, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tier {
    /// Tier identifier
    pub id: TierId,

    /// Human-readable scope description
    pub scope: String,

    /// Wall-clock budget for the tier's run, if the policy fixes one
    pub time_budget: Option<Duration>,

    /// Directory glob patterns selecting this tier's test files
    pub patterns: Vec<TierPattern>,

    /// CI event routing to this tier (`None` only for `Common`)
    pub trigger: Option<Trigger>,

    /// Hardware class (`None` only for `Common`)
    pub hardware: Option<Hardware>,

    /// Marker names the external test runner filters by
    pub markers: Vec<String>,
}

impl Tier {
    /// Whether this tier is routed to a CI event
    ///
    /// `Common` is a documentation bucket: no trigger, no hardware, no
    /// patterns of its own.
    pub fn is_routable(&self) -> bool {
        self.trigger.is_some()
    }

    /// Marker expression for the external runner, e.g. `core_model and cpu`
    ///
    /// Returns `None` when the tier declares no markers.
    pub fn marker_expr(&self) -> Option<String> {
        if self.markers.is_empty() {
            None
        } else {
            Some(self.markers.join(" and "))
        }
    }
}

/// Classification result for a candidate path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMatch {
    /// Tier the path belongs to
    pub tier: TierId,
    /// Suite within the tier
    pub suite: Suite,
    /// The glob pattern that matched
    pub pattern: String,
}
