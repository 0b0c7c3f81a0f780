use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use vigil_health::{Component, ComponentState};

use crate::cache::ComponentRecord;

/// Point-in-time view of one component, suitable for a status endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComponentReport {
    /// Which component this describes.
    pub component: Component,
    /// The settled state.
    pub state: ComponentState,
    /// When the component was last probed.
    pub last_checked_at: Option<SystemTime>,
    /// When the settled state last changed.
    pub last_changed_at: Option<SystemTime>,
}

impl ComponentReport {
    pub(crate) const fn from_record(component: Component, record: &ComponentRecord) -> Self {
        Self {
            component,
            state: record.state,
            last_checked_at: record.last_checked_at,
            last_changed_at: record.last_changed_at,
        }
    }
}

/// Snapshot of the whole system for the transport boundary.
///
/// `overall` is recomputed from the three component states at snapshot time,
/// never stored, so it cannot diverge from the per-component values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusReport {
    /// Data store health.
    pub db: ComponentReport,
    /// Auth provider health.
    pub auth: ComponentReport,
    /// Forum backend health.
    pub forum: ComponentReport,
    /// Worst-case state across all components.
    pub overall: ComponentState,
    /// When this snapshot was taken.
    pub generated_at: SystemTime,
}

impl StatusReport {
    /// The report for a single component.
    #[must_use]
    pub const fn component(&self, component: Component) -> &ComponentReport {
        match component {
            Component::Db => &self.db,
            Component::Auth => &self.auth,
            Component::Forum => &self.forum,
        }
    }
}
