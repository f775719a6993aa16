use std::path::PathBuf;
use thiserror::Error;

/// Result type for testtriage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for testtriage operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A tier identifier outside the defined set was requested
    #[error("Unknown tier '{0}': expected one of common, l1, l2, l3, l4, l5")]
    UnknownTier(String),

    /// A trigger identifier outside the defined set was requested
    #[error(
        "Unknown trigger '{0}': expected one of pr_ready_label, pr_merged, nightly, weekly, pre_release"
    )]
    UnknownTrigger(String),

    /// A candidate path matched no tier pattern
    ///
    /// Advisory: the path is reported for manual triage, it does not block
    /// the run.
    #[error("Unclassified test candidate: {path}")]
    Unclassified { path: PathBuf },

    /// Malformed glob pattern
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an unknown tier error
    pub fn unknown_tier(name: impl Into<String>) -> Self {
        Self::UnknownTier(name.into())
    }

    /// Creates an unknown trigger error
    pub fn unknown_trigger(name: impl Into<String>) -> Self {
        Self::UnknownTrigger(name.into())
    }

    /// Creates an unclassified candidate error
    pub fn unclassified(path: impl Into<PathBuf>) -> Self {
        Self::Unclassified { path: path.into() }
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
