// ── Core error types ──
//
// Errors surfaced by the dashboard session to its UI. Metric fetch
// failures never appear here: they are absorbed by the fallback policy.

use pidash_api::PowerAction;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Power sequencing ─────────────────────────────────────────────
    #[error("a {action} is already in progress")]
    PowerActionActive { action: PowerAction },

    #[error("no power action is waiting for confirmation")]
    NothingToConfirm,

    // ── API errors ───────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] pidash_api::Error),
}
