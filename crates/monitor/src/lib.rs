//! Reports the operational health of the backend subsystems (data store,
//! auth provider, forum backend) to callers who need a fast, non-blocking
//! answer to "can the application serve traffic right now."
//!
//! Probes run on a background refresh loop; results pass through a debounce
//! filter so a single transient blip never flaps the reported state. Reads
//! are always served from the cache and never trigger a probe.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod cache;
mod config;
mod error;
mod report;

pub use cache::{ComponentRecord, HealthCache};
pub use config::MonitorConfig;
pub use error::{Error, Result};
pub use report::{ComponentReport, StatusReport};

use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::{Mutex, Notify};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use vigil_health::{Component, ComponentState, HealthCheck};

/// Options for configuring a [`StatusMonitor`].
pub struct MonitorOptions {
    /// Probe scheduling and debounce settings.
    pub config: MonitorConfig,

    /// Checker for the data store.
    pub db_check: Arc<dyn HealthCheck>,

    /// Checker for the auth provider.
    pub auth_check: Arc<dyn HealthCheck>,

    /// Checker for the forum backend.
    pub forum_check: Arc<dyn HealthCheck>,
}

/// Aggregates per-component health into a system verdict.
///
/// Holds the only writer to the health cache; everything callers see goes
/// through the non-blocking read accessors. Cloning is cheap and all clones
/// share the same state.
#[derive(Clone)]
pub struct StatusMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    cache: HealthCache,
    checks: [Arc<dyn HealthCheck>; 3],
    config: MonitorConfig,
    refresh_gate: Mutex<()>,
    refresh_trigger: Notify,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl StatusMonitor {
    /// Creates a new monitor. No probes run until [`Self::start`] or
    /// [`Self::refresh_all`] is called; until then every accessor reports
    /// [`ComponentState::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid, or
    /// [`Error::CheckerMismatch`] if a checker was supplied for the wrong
    /// component slot.
    pub fn new(
        MonitorOptions {
            config,
            db_check,
            auth_check,
            forum_check,
        }: MonitorOptions,
    ) -> Result<Self> {
        config.validate()?;

        let checks = [db_check, auth_check, forum_check];
        for (expected, check) in Component::ALL.into_iter().zip(&checks) {
            if check.component() != expected {
                return Err(Error::CheckerMismatch {
                    expected,
                    actual: check.component(),
                });
            }
        }

        Ok(Self {
            inner: Arc::new(Inner {
                cache: HealthCache::new(),
                checks,
                config,
                refresh_gate: Mutex::new(()),
                refresh_trigger: Notify::new(),
                shutdown_token: CancellationToken::new(),
                task_tracker: TaskTracker::new(),
            }),
        })
    }

    /// Settled state of the data store. Non-blocking; never probes.
    #[must_use]
    pub fn db_state(&self) -> ComponentState {
        self.state_of(Component::Db)
    }

    /// Settled state of the auth provider. Non-blocking; never probes.
    #[must_use]
    pub fn auth_state(&self) -> ComponentState {
        self.state_of(Component::Auth)
    }

    /// Settled state of the forum backend. Non-blocking; never probes.
    #[must_use]
    pub fn forum_state(&self) -> ComponentState {
        self.state_of(Component::Forum)
    }

    /// Settled state of any component.
    #[must_use]
    pub fn state_of(&self, component: Component) -> ComponentState {
        self.inner.cache.state(component)
    }

    /// Worst-case state across all components.
    #[must_use]
    pub fn overall_state(&self) -> ComponentState {
        Component::ALL
            .into_iter()
            .map(|component| self.inner.cache.state(component))
            .fold(ComponentState::Healthy, ComponentState::worse_of)
    }

    /// Full snapshot for the transport boundary.
    #[must_use]
    pub fn report(&self) -> StatusReport {
        let record = |component| {
            ComponentReport::from_record(component, &self.inner.cache.record(component))
        };

        StatusReport {
            db: record(Component::Db),
            auth: record(Component::Auth),
            forum: record(Component::Forum),
            overall: self.overall_state(),
            generated_at: SystemTime::now(),
        }
    }

    /// Probes every component once and feeds the results through the
    /// debounce filter.
    ///
    /// Probes run concurrently, each under its own deadline; a probe failure
    /// or timeout is recorded as [`ComponentState::Unknown`] and never
    /// prevents the other components from completing their cycle. If a
    /// refresh is already in flight the call is coalesced into a no-op. On
    /// shutdown, in-flight probes are abandoned and their records left at
    /// the last settled value.
    pub async fn refresh_all(&self) {
        let Ok(_guard) = self.inner.refresh_gate.try_lock() else {
            debug!("refresh already in flight, coalescing");
            return;
        };

        let cycle = async {
            tokio::join!(
                self.probe_one(&self.inner.checks[0]),
                self.probe_one(&self.inner.checks[1]),
                self.probe_one(&self.inner.checks[2]),
            );
        };

        tokio::select! {
            () = cycle => {}
            () = self.inner.shutdown_token.cancelled() => {
                debug!("refresh cancelled, abandoning in-flight probes");
            }
        }
    }

    async fn probe_one(&self, check: &Arc<dyn HealthCheck>) {
        let component = check.component();

        let observed =
            match tokio::time::timeout(self.inner.config.probe_timeout, check.probe()).await {
                Ok(Ok(state)) => state,
                Ok(Err(e)) => {
                    warn!(component = %component, error = %e, "probe failed");
                    ComponentState::Unknown
                }
                Err(_) => {
                    warn!(
                        component = %component,
                        deadline = ?self.inner.config.probe_timeout,
                        "probe deadline exceeded"
                    );
                    ComponentState::Unknown
                }
            };

        self.inner
            .cache
            .observe(component, observed, self.inner.config.confirmations);
    }

    /// Starts the periodic refresh loop.
    ///
    /// The first refresh runs immediately; subsequent ones on the configured
    /// interval. Missed ticks are skipped rather than queued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] if the loop is already running.
    pub fn start(&self) -> Result<()> {
        if self.inner.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        let monitor = self.clone();
        self.inner.task_tracker.spawn(async move {
            let mut interval = tokio::time::interval(monitor.inner.config.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => monitor.refresh_all().await,
                    () = monitor.inner.refresh_trigger.notified() => monitor.refresh_all().await,
                    () = monitor.inner.shutdown_token.cancelled() => {
                        info!("status monitor shutting down");
                        break;
                    }
                }
            }
        });

        self.inner.task_tracker.close();

        Ok(())
    }

    /// Requests an operator-initiated refresh.
    ///
    /// The refresh runs on the background loop. A trigger arriving while a
    /// refresh is already in flight is dropped, not queued; health status
    /// tolerates staleness better than back-to-back probe cycles against a
    /// struggling dependency.
    pub fn trigger_refresh(&self) {
        if self.inner.refresh_gate.try_lock().is_err() {
            debug!("refresh already in flight, dropping manual trigger");
            return;
        }

        self.inner.refresh_trigger.notify_one();
    }

    /// Stops the refresh loop and waits for it to exit. Cached states remain
    /// readable afterwards.
    pub async fn shutdown(&self) {
        self.inner.shutdown_token.cancel();
        self.inner.task_tracker.close();
        self.inner.task_tracker.wait().await;
    }
}
