// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording fake runtime and tracing setup for integration tests.

use async_trait::async_trait;
use dockward::runtime::{
    ContainerError, ContainerExit, ContainerState, LifecycleOps, RemoveOptions,
};
use dockward::types::{ContainerId, ContainerRef};
use dockward::signal::KillSignal;
use parking_lot::Mutex;
use std::sync::Once;
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("dockward=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One runtime call as observed by [`FakeRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Lookup(String),
    State(String),
    StopTimeout(String),
    Kill(String, KillSignal),
    Pause(String),
    Unpause(String),
    Stop(String, Option<Duration>),
    Restart(String, Duration),
    Wait(String),
    Remove(String, RemoveOptions),
}

impl Call {
    /// Whether the call changes container state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Call::Lookup(_) | Call::State(_) | Call::StopTimeout(_) | Call::Wait(_)
        )
    }
}

struct FakeContainer {
    name: String,
    id: String,
    state: ContainerState,
}

/// In-memory [`LifecycleOps`] that records every call it receives.
///
/// Lookup matches a container by exact name or by ID prefix. Mutating calls
/// succeed unless the runtime was built with [`FakeRuntime::failing`].
pub struct FakeRuntime {
    containers: Vec<FakeContainer>,
    calls: Mutex<Vec<Call>>,
    exit: ContainerExit,
    stop_timeout: Duration,
    operation_failure: Option<String>,
    lookup_failure: Option<String>,
    state_failure: Option<String>,
    wait_forever: bool,
}

#[allow(dead_code)]
impl FakeRuntime {
    pub fn new() -> Self {
        Self {
            containers: Vec::new(),
            calls: Mutex::new(Vec::new()),
            exit: ContainerExit::clean(0),
            stop_timeout: Duration::from_secs(10),
            operation_failure: None,
            lookup_failure: None,
            state_failure: None,
            wait_forever: false,
        }
    }

    /// Add a container whose ID is `id-` followed by its name.
    pub fn with_container(mut self, name: &str, state: ContainerState) -> Self {
        self.containers.push(FakeContainer {
            name: name.to_string(),
            id: Self::id_of(name),
            state,
        });
        self
    }

    pub fn with_exit(mut self, exit: ContainerExit) -> Self {
        self.exit = exit;
        self
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Make every mutating call fail with a runtime error.
    pub fn failing(mut self, message: &str) -> Self {
        self.operation_failure = Some(message.to_string());
        self
    }

    pub fn failing_lookup(mut self, message: &str) -> Self {
        self.lookup_failure = Some(message.to_string());
        self
    }

    pub fn failing_state(mut self, message: &str) -> Self {
        self.state_failure = Some(message.to_string());
        self
    }

    /// Make `wait_container` block until the caller gives up.
    pub fn waiting_forever(mut self) -> Self {
        self.wait_forever = true;
        self
    }

    pub fn id_of(name: &str) -> String {
        format!("id-{name}")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(Call::is_mutation)
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn outcome(&self) -> Result<(), ContainerError> {
        match &self.operation_failure {
            Some(message) => Err(ContainerError::Runtime(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LifecycleOps for FakeRuntime {
    async fn lookup_container(
        &self,
        reference: &ContainerRef,
    ) -> Result<ContainerId, ContainerError> {
        self.record(Call::Lookup(reference.to_string()));

        if let Some(message) = &self.lookup_failure {
            return Err(ContainerError::Runtime(message.clone()));
        }

        self.containers
            .iter()
            .find(|c| c.name == reference.as_str() || c.id.starts_with(reference.as_str()))
            .map(|c| ContainerId::new(c.id.clone()))
            .ok_or_else(|| ContainerError::NotFound(reference.to_string()))
    }

    async fn container_state(&self, id: &ContainerId) -> Result<ContainerState, ContainerError> {
        self.record(Call::State(id.to_string()));

        if let Some(message) = &self.state_failure {
            return Err(ContainerError::Runtime(message.clone()));
        }

        self.containers
            .iter()
            .find(|c| c.id == id.as_str())
            .map(|c| c.state)
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))
    }

    async fn kill_container(
        &self,
        id: &ContainerId,
        signal: KillSignal,
    ) -> Result<(), ContainerError> {
        self.record(Call::Kill(id.to_string(), signal));
        self.outcome()
    }

    async fn pause_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.record(Call::Pause(id.to_string()));
        self.outcome()
    }

    async fn unpause_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.record(Call::Unpause(id.to_string()));
        self.outcome()
    }

    async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.record(Call::Stop(id.to_string(), None));
        self.outcome()
    }

    async fn stop_container_with_timeout(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError> {
        self.record(Call::Stop(id.to_string(), Some(timeout)));
        self.outcome()
    }

    async fn stop_timeout(&self, id: &ContainerId) -> Result<Duration, ContainerError> {
        self.record(Call::StopTimeout(id.to_string()));
        Ok(self.stop_timeout)
    }

    async fn restart_container_with_timeout(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError> {
        self.record(Call::Restart(id.to_string(), timeout));
        self.outcome()
    }

    async fn wait_container(&self, id: &ContainerId) -> ContainerExit {
        self.record(Call::Wait(id.to_string()));
        if self.wait_forever {
            std::future::pending::<()>().await;
        }
        self.exit.clone()
    }

    async fn remove_container(
        &self,
        id: &ContainerId,
        options: RemoveOptions,
    ) -> Result<(), ContainerError> {
        self.record(Call::Remove(id.to_string(), options));
        self.outcome()
    }
}
