//! Error types

use crate::scope::ScopeId;

/// Errors surfaced by scope tree and configuration operations.
///
/// Registry and reconciliation outcomes are never errors: duplicate
/// registrations overwrite, unknown unregistrations are ignored.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scope was never created or has already been unmounted.
    #[error("Scope {0} does not exist")]
    UnknownScope(ScopeId),

    /// Direction value outside the known axes.
    #[error("Invalid direction {0}: expected 0 (horizontal) or 1 (vertical)")]
    InvalidDirection(u8),

    /// Options document could not be parsed.
    #[error("Invalid scroll options: {0}")]
    Options(#[from] serde_json::Error),

    /// The driver stopped before the command could be delivered.
    #[error("Driver is no longer running")]
    DriverClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
