//! Health checker that probes a dependency by opening a TCP connection.
//!
//! Used for the data store, where a successful connect is enough evidence
//! that the server is accepting traffic. A refused connection is a
//! definitive unhealthy verdict, not a probe failure.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::io::ErrorKind;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

use vigil_health::{Component, ComponentState, HealthCheck, ProbeError};

/// Probes a single TCP endpoint.
pub struct TcpCheck {
    component: Component,
    addr: String,
}

impl TcpCheck {
    /// Creates a new checker for the given `host:port` address.
    #[must_use]
    pub fn new(component: Component, addr: impl Into<String>) -> Self {
        Self {
            component,
            addr: addr.into(),
        }
    }
}

#[async_trait]
impl HealthCheck for TcpCheck {
    fn component(&self) -> Component {
        self.component
    }

    async fn probe(&self) -> Result<ComponentState, ProbeError> {
        match TcpStream::connect(&self.addr).await {
            Ok(_) => {
                debug!(component = %self.component, addr = %self.addr, "tcp probe connected");
                Ok(ComponentState::Healthy)
            }
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                debug!(component = %self.component, addr = %self.addr, "tcp probe refused");
                Ok(ComponentState::Unhealthy)
            }
            Err(e) => Err(ProbeError::Transport(e.to_string())),
        }
    }
}
