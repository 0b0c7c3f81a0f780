use thiserror::Error;

use vigil_health::Component;

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Monitor already started.
    #[error("already started")]
    AlreadyStarted,

    /// Invalid configuration. Fatal at startup; indicates a misconfigured
    /// deployment.
    #[error("invalid configuration: {0}")]
    Config(&'static str),

    /// A checker was wired into the wrong slot.
    #[error("checker for {expected} reports component {actual}")]
    CheckerMismatch {
        /// The slot the checker was supplied for.
        expected: Component,
        /// The component the checker claims to probe.
        actual: Component,
    },
}
