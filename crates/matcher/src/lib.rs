#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Test tier classification and routing
//!
//! This crate turns the static tier catalog into actionable CI routing:
//! - Glob-based classification of candidate paths into tiers
//! - Filesystem discovery of test candidates with ignore filtering
//! - Run planning per CI trigger event, with superset expansion
//!
//! # Example
//!
//! ```no_run
//! use testtriage_core::catalog::TierCatalog;
//! use testtriage_matcher::TierMatcher;
//! use std::path::Path;
//!
//! # fn example() -> testtriage_core::Result<()> {
//! let catalog = TierCatalog::builtin();
//! let matcher = TierMatcher::new(&catalog)?;
//!
//! if let Some(found) = matcher.classify(Path::new("tests/engine/test_arg_utils.py")) {
//!     println!("{} -> {}", "tests/engine/test_arg_utils.py", found.tier);
//! }
//! # Ok(())
//! # }
//! ```

// Private implementation modules
mod discovery;
mod matcher;
mod plan;

// Public exports - minimal API surface
pub use discovery::{discover, DiscoveryReport, TestCandidate};
pub use matcher::TierMatcher;
pub use plan::{RunPlan, TierRun};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::discovery::{discover, DiscoveryReport};
    pub use crate::matcher::TierMatcher;
    pub use crate::plan::RunPlan;
}
