//! Error types for the `wardstone-world` crate.

use wardstone_types::ConditionId;

/// Errors that can occur during world-state operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A condition id outside the closed, startup-registered id space
    /// was addressed. This is a programming error at the call site, not
    /// a recoverable condition.
    #[error("unknown condition id: {0}")]
    UnknownCondition(ConditionId),

    /// A locking domain's mutex was poisoned by a panicking thread.
    #[error("locking domain mutex poisoned")]
    DomainPoisoned,
}
