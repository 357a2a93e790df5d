use thiserror::Error;

use crate::api::types::Slot;

/// Errors raised by the orrery core.
///
/// None of these are fatal: every failure degrades to "no visual change".
#[derive(Debug, Error)]
pub enum OrreryError {
    /// The requested body has no registered template.
    #[error("no body named `{name}`")]
    NotFound { name: String },

    /// A comparison request was malformed (missing or identical names).
    #[error("invalid comparison request: {reason}")]
    InvalidComparison { reason: String },

    /// A completion arrived for a transition that a newer request superseded.
    /// Internal signal only; swallowed by the orchestrator.
    #[error("stale transition on {slot} slot (generation {generation})")]
    StaleTransition { slot: Slot, generation: u64 },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl OrreryError {
    pub fn not_found(name: impl Into<String>) -> Self {
        OrreryError::NotFound { name: name.into() }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        OrreryError::InvalidComparison { reason: reason.into() }
    }
}
