use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::{debug, info};

use vigil_health::{Component, ComponentState};

/// Last-known health of one component, as held by the cache.
///
/// `state` is the settled, externally visible value. `candidate` and
/// `consecutive_confirmations` track a possible state change working its way
/// through the debounce threshold.
#[derive(Debug, Clone, Copy)]
pub struct ComponentRecord {
    /// The settled state reported to callers.
    pub state: ComponentState,
    /// The most recently observed state, settled or not.
    pub candidate: ComponentState,
    /// Length of the current run of identical observations.
    pub consecutive_confirmations: u32,
    /// When the component was last probed. `None` until the first probe
    /// completes.
    pub last_checked_at: Option<SystemTime>,
    /// When the settled state last changed.
    pub last_changed_at: Option<SystemTime>,
}

impl ComponentRecord {
    const fn unknown() -> Self {
        Self {
            state: ComponentState::Unknown,
            candidate: ComponentState::Unknown,
            consecutive_confirmations: 0,
            last_checked_at: None,
            last_changed_at: None,
        }
    }
}

/// Holds the settled state of every monitored component behind a single read
/// lock. The aggregator is the only writer; reads never block on probes.
#[derive(Debug)]
pub struct HealthCache {
    records: RwLock<[ComponentRecord; 3]>,
}

const fn index(component: Component) -> usize {
    match component {
        Component::Db => 0,
        Component::Auth => 1,
        Component::Forum => 2,
    }
}

impl HealthCache {
    /// Creates a cache with every component in `Unknown` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new([ComponentRecord::unknown(); 3]),
        }
    }

    /// The settled state of a component.
    #[must_use]
    pub fn state(&self, component: Component) -> ComponentState {
        self.records.read()[index(component)].state
    }

    /// A copy of the full record for a component.
    #[must_use]
    pub fn record(&self, component: Component) -> ComponentRecord {
        self.records.read()[index(component)]
    }

    /// Feeds one probe result through the debounce policy.
    ///
    /// A state change only settles after `threshold` consecutive probes
    /// report the same new state; until then the previously settled state
    /// continues to be reported. The very first probe after startup settles
    /// immediately, since there is no prior baseline to debounce against. A
    /// result matching the settled state clears any pending change.
    pub fn observe(&self, component: Component, observed: ComponentState, threshold: u32) {
        let now = SystemTime::now();
        let mut records = self.records.write();
        let record = &mut records[index(component)];

        if record.last_checked_at.is_none() {
            record.state = observed;
            record.candidate = observed;
            record.consecutive_confirmations = 1;
            record.last_checked_at = Some(now);
            record.last_changed_at = Some(now);
            info!(component = %component, state = %observed, "initial state settled");
            return;
        }

        record.last_checked_at = Some(now);

        if observed == record.candidate {
            record.consecutive_confirmations = record.consecutive_confirmations.saturating_add(1);
        } else {
            record.candidate = observed;
            record.consecutive_confirmations = 1;
        }

        if record.candidate == record.state {
            return;
        }

        if record.consecutive_confirmations >= threshold {
            info!(
                component = %component,
                from = %record.state,
                to = %record.candidate,
                "state changed"
            );
            record.state = record.candidate;
            record.last_changed_at = Some(now);
        } else {
            debug!(
                component = %component,
                settled = %record.state,
                candidate = %record.candidate,
                confirmations = record.consecutive_confirmations,
                threshold,
                "state change pending confirmation"
            );
        }
    }
}

impl Default for HealthCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_health::Component::Db;
    use vigil_health::ComponentState::{Degraded, Healthy, Unhealthy, Unknown};

    #[test]
    fn starts_unknown_with_no_timestamps() {
        let cache = HealthCache::new();

        for component in Component::ALL {
            let record = cache.record(component);
            assert_eq!(record.state, Unknown);
            assert!(record.last_checked_at.is_none());
            assert!(record.last_changed_at.is_none());
        }
    }

    #[test]
    fn first_probe_settles_immediately() {
        let cache = HealthCache::new();

        cache.observe(Db, Healthy, 2);

        let record = cache.record(Db);
        assert_eq!(record.state, Healthy);
        assert_eq!(record.consecutive_confirmations, 1);
        assert!(record.last_checked_at.is_some());
        assert!(record.last_changed_at.is_some());
    }

    #[test]
    fn single_divergent_probe_is_suppressed() {
        let cache = HealthCache::new();
        cache.observe(Db, Healthy, 2);

        cache.observe(Db, Unhealthy, 2);

        assert_eq!(cache.state(Db), Healthy);
        assert_eq!(cache.record(Db).candidate, Unhealthy);
    }

    #[test]
    fn second_consecutive_divergent_probe_settles() {
        let cache = HealthCache::new();
        cache.observe(Db, Healthy, 2);

        cache.observe(Db, Unhealthy, 2);
        cache.observe(Db, Unhealthy, 2);

        assert_eq!(cache.state(Db), Unhealthy);
    }

    #[test]
    fn matching_probe_clears_pending_change() {
        let cache = HealthCache::new();
        cache.observe(Db, Healthy, 2);

        cache.observe(Db, Unhealthy, 2);
        cache.observe(Db, Healthy, 2);
        cache.observe(Db, Unhealthy, 2);

        // The run of unhealthy observations was broken, so nothing settles.
        assert_eq!(cache.state(Db), Healthy);
    }

    #[test]
    fn flapping_never_settles() {
        let cache = HealthCache::new();
        cache.observe(Db, Healthy, 2);

        for _ in 0..10 {
            cache.observe(Db, Unhealthy, 2);
            cache.observe(Db, Healthy, 2);
        }

        assert_eq!(cache.state(Db), Healthy);
    }

    #[test]
    fn higher_threshold_needs_longer_run() {
        let cache = HealthCache::new();
        cache.observe(Db, Healthy, 3);

        cache.observe(Db, Degraded, 3);
        cache.observe(Db, Degraded, 3);
        assert_eq!(cache.state(Db), Healthy);

        cache.observe(Db, Degraded, 3);
        assert_eq!(cache.state(Db), Degraded);
    }

    #[test]
    fn last_changed_only_moves_on_settle() {
        let cache = HealthCache::new();
        cache.observe(Db, Healthy, 2);
        let settled_at = cache.record(Db).last_changed_at;

        cache.observe(Db, Healthy, 2);
        cache.observe(Db, Unhealthy, 2);

        let record = cache.record(Db);
        assert_eq!(record.last_changed_at, settled_at);
        assert!(record.last_checked_at >= settled_at);
    }

    #[test]
    fn components_are_independent() {
        let cache = HealthCache::new();

        cache.observe(Db, Healthy, 2);
        cache.observe(Component::Auth, Unhealthy, 2);

        assert_eq!(cache.state(Db), Healthy);
        assert_eq!(cache.state(Component::Auth), Unhealthy);
        assert_eq!(cache.state(Component::Forum), Unknown);
    }
}
