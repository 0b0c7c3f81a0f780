use std::fmt;

use serde::{Deserialize, Serialize};

/// Health state of a single monitored component.
///
/// Variant order is severity order, so `Ord::max` yields the worse of two
/// states. `Unknown` sorts worst: absence of information must never be
/// reported as healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentState {
    /// Component is fully operational.
    Healthy,
    /// Component is reachable but impaired.
    Degraded,
    /// Component is down.
    Unhealthy,
    /// No probe has completed, or the last probe failed outright.
    Unknown,
}

impl ComponentState {
    /// Returns the more severe of two states. Commutative and associative,
    /// so chaining over any number of components is order-independent.
    #[must_use]
    pub fn worse_of(self, other: Self) -> Self {
        self.max(other)
    }

    /// Whether the component is at least reachable and answering.
    #[must_use]
    pub const fn is_serving(self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }

    /// String form matching the wire encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "HEALTHY",
            Self::Degraded => "DEGRADED",
            Self::Unhealthy => "UNHEALTHY",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One monitored backend subsystem. Fixed set; no dynamic registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// The data store.
    Db,
    /// The authentication provider.
    Auth,
    /// The discussion/forum backend.
    Forum,
}

impl Component {
    /// All monitored components, in reporting order.
    pub const ALL: [Self; 3] = [Self::Db, Self::Auth, Self::Forum];

    /// Short identifier used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Db => "db",
            Self::Auth => "auth",
            Self::Forum => "forum",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
