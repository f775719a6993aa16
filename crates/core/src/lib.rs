//! Core types for the testtriage tier classification system
//!
//! This crate provides the foundational abstractions used throughout
//! testtriage, including:
//!
//! - **Tiers**: the five testing levels (plus the Common bucket), their
//!   triggers, hardware classes, and directory patterns
//! - **Catalog**: the authoritative, immutable tier table
//! - **Configuration**: layered TOML + environment configuration
//! - **Error handling**: unified error types
//!

pub mod catalog;
pub mod config;
pub mod error;
pub mod tiers;

// Re-export main types for convenience
pub use catalog::TierCatalog;
pub use config::{Config, DiscoveryConfig, OutputConfig, PatternsConfig};
pub use error::{Error, Result, ResultExt};
pub use tiers::{Hardware, Suite, Tier, TierId, TierMatch, TierPattern, Trigger};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::TierCatalog;
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
    pub use crate::tiers::{Tier, TierId, TierMatch, Trigger};
}
