//! Supervisor error taxonomy.

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by supervisor operations.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The named pattern is not in the registry.
    #[error("pattern '{0}' not found")]
    PatternNotFound(String),

    /// The named hook is not loaded.
    #[error("hook '{0}' not found")]
    HookNotFound(String),

    /// The hook exists but has no pattern link to remove.
    #[error("hook '{0}' not linked")]
    HookNotLinked(String),

    /// The hook cannot be armed manually.
    #[error("hook '{0}' cannot be triggered manually")]
    NotTriggerable(String),

    /// A pattern ignored cancellation and had to be abandoned.
    #[error("pattern '{name}' did not stop within {timeout_ms}ms")]
    StopTimeout {
        /// Pattern that was abandoned.
        name: String,
        /// How long it was given to wind down.
        timeout_ms: u64,
    },

    /// Persistence failed underneath a supervisor operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}
