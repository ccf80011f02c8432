//! Shared error type across druidscope crates.
//!
//! Note the deliberately small surface: ingest has no error path at all
//! (bad datapoints are counted and dropped), so everything here is a
//! startup-time condition.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, DruidScopeError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum DruidScopeError {
    /// Config file unreadable, unparseable, or failing validation.
    #[error("bad config: {0}")]
    BadConfig(String),
    /// A metric registry entry with an inconsistent declaration. Always a
    /// programming defect, checked once at startup.
    #[error("invalid registry entry: {0}")]
    Registry(String),
    #[error("internal: {0}")]
    Internal(String),
}
