//! Health checker that probes a dependency over HTTP.
//!
//! Used for the auth provider and the forum backend, both of which expose a
//! status URL. The verdict comes from the response status code, with an
//! optional latency threshold that downgrades slow-but-successful responses
//! to degraded.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use vigil_health::{Component, ComponentState, HealthCheck, ProbeError};

/// Options for configuring an [`HttpCheck`].
pub struct HttpCheckOptions {
    /// Which component the URL belongs to.
    pub component: Component,

    /// The status URL to probe.
    pub url: String,

    /// Successful responses slower than this are reported as degraded.
    pub degraded_after: Option<Duration>,
}

/// Probes a single HTTP status URL.
pub struct HttpCheck {
    client: Client,
    component: Component,
    url: String,
    degraded_after: Option<Duration>,
}

impl HttpCheck {
    /// Creates a new checker for the given URL.
    #[must_use]
    pub fn new(
        HttpCheckOptions {
            component,
            url,
            degraded_after,
        }: HttpCheckOptions,
    ) -> Self {
        Self {
            client: Client::new(),
            component,
            url,
            degraded_after,
        }
    }

    fn classify(&self, status: StatusCode, elapsed: Duration) -> Result<ComponentState, ProbeError> {
        if status.is_success() {
            let slow = self
                .degraded_after
                .is_some_and(|threshold| elapsed > threshold);
            return Ok(if slow {
                ComponentState::Degraded
            } else {
                ComponentState::Healthy
            });
        }

        // Back-pressure responses mean the dependency is up but struggling.
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(ComponentState::Degraded);
        }

        if status.is_client_error() || status.is_server_error() {
            return Ok(ComponentState::Unhealthy);
        }

        Err(ProbeError::Unexpected(format!("status {status}")))
    }
}

#[async_trait]
impl HealthCheck for HttpCheck {
    fn component(&self) -> Component {
        self.component
    }

    async fn probe(&self) -> Result<ComponentState, ProbeError> {
        let started = Instant::now();

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        let elapsed = started.elapsed();
        let state = self.classify(response.status(), elapsed)?;

        debug!(
            component = %self.component,
            status = %response.status(),
            elapsed = ?elapsed,
            state = %state,
            "http probe completed"
        );

        Ok(state)
    }
}
