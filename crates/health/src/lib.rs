//! Capability contract for pluggable backend health checks.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod state;

pub use error::ProbeError;
pub use state::{Component, ComponentState};

use async_trait::async_trait;

/// A single pluggable probe against one backend subsystem.
///
/// Concrete checkers (a SQL ping, an HTTP call to the auth provider, a forum
/// API call) implement this one method; the aggregator sees nothing else of
/// them. A checker must not block indefinitely — the aggregator wraps every
/// probe in a hard deadline, but that deadline is a backstop, not a substitute
/// for a well-behaved checker.
#[async_trait]
pub trait HealthCheck: Send + Sync + 'static {
    /// Which component this checker probes.
    fn component(&self) -> Component;

    /// Runs one probe and reports the observed state.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] on timeout or transport failure; the caller
    /// maps this to [`ComponentState::Unknown`], never to healthy.
    async fn probe(&self) -> Result<ComponentState, ProbeError>;
}
