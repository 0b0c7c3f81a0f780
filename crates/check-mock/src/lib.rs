//! Scripted health checker for tests and local development.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use vigil_health::{Component, ComponentState, HealthCheck, ProbeError};

/// One scripted probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStep {
    /// Report the given state.
    State(ComponentState),
    /// Fail with a transport error.
    Fail,
    /// Never complete; the caller's deadline or cancellation must fire.
    Hang,
}

/// A checker that replays a script of probe outcomes.
///
/// Steps are consumed in order; once the script is exhausted the last step
/// repeats forever.
pub struct MockCheck {
    component: Component,
    script: Mutex<VecDeque<MockStep>>,
    last: Mutex<MockStep>,
    delay: Option<Duration>,
    probes: AtomicU32,
}

impl MockCheck {
    /// A checker that always reports healthy.
    #[must_use]
    pub fn healthy(component: Component) -> Self {
        Self::fixed(component, ComponentState::Healthy)
    }

    /// A checker that always reports the given state.
    #[must_use]
    pub fn fixed(component: Component, state: ComponentState) -> Self {
        Self::scripted(component, [MockStep::State(state)])
    }

    /// A checker whose probes never complete.
    #[must_use]
    pub fn pending(component: Component) -> Self {
        Self::scripted(component, [MockStep::Hang])
    }

    /// A checker that replays the given steps, repeating the last one once
    /// the script runs out.
    ///
    /// # Panics
    ///
    /// Panics if the script is empty.
    #[must_use]
    pub fn scripted(component: Component, steps: impl IntoIterator<Item = MockStep>) -> Self {
        let script: VecDeque<MockStep> = steps.into_iter().collect();
        let last = *script.back().expect("mock script must not be empty");

        Self {
            component,
            script: Mutex::new(script),
            last: Mutex::new(last),
            delay: None,
            probes: AtomicU32::new(0),
        }
    }

    /// Makes every probe take at least `delay` before completing.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many probes have been issued against this checker.
    #[must_use]
    pub fn probe_count(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> MockStep {
        match self.script.lock().pop_front() {
            Some(step) => {
                *self.last.lock() = step;
                step
            }
            None => *self.last.lock(),
        }
    }
}

#[async_trait]
impl HealthCheck for MockCheck {
    fn component(&self) -> Component {
        self.component
    }

    async fn probe(&self) -> Result<ComponentState, ProbeError> {
        self.probes.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_step() {
            MockStep::State(state) => Ok(state),
            MockStep::Fail => Err(ProbeError::Transport("mock transport failure".to_string())),
            MockStep::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
