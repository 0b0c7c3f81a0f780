use std::time::Duration;

use thiserror::Error;

/// Errors a health probe can fail with.
///
/// These never reach callers of the status accessors; the aggregator maps
/// every probe failure to `ComponentState::Unknown`.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe did not complete within its deadline.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// Could not reach the dependency at all.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The dependency answered with something the checker cannot interpret.
    #[error("unexpected response: {0}")]
    Unexpected(String),
}
