// ABOUTME: Bollard-based container runtime implementation.
// ABOUTME: Drives Docker or Podman through the Docker-compatible engine API.

use crate::runtime::traits::{
    ContainerError, ContainerExit, ContainerState, LifecycleOps, RemoveOptions, RuntimeInfo,
    RuntimeInfoError, RuntimeMetadata,
};
use crate::runtime::types::{DetectedRuntime, RuntimeType};
use crate::signal::KillSignal;
use crate::types::{ContainerId, ContainerRef};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{ContainerInspectResponse, ContainerStateStatusEnum};
use bollard::query_parameters::{
    InspectContainerOptions, KillContainerOptions, RemoveContainerOptions,
    RestartContainerOptions, StopContainerOptions, WaitContainerOptions,
};
use futures::StreamExt;
use std::time::Duration;

/// Request timeout for short engine calls (inspect, kill, pause, remove).
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Request timeout for calls that legitimately block: wait, and stop or
/// restart with a caller-chosen grace period.
const LONG_REQUEST_TIMEOUT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_container_not_found_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_state_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 304 || *status_code == 409 => {
            ContainerError::NotRunning(message.clone())
        }
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_state(details: &ContainerInspectResponse) -> ContainerState {
    details
        .state
        .as_ref()
        .and_then(|s| s.status)
        .map(|s| match s {
            ContainerStateStatusEnum::CREATED => ContainerState::Created,
            ContainerStateStatusEnum::RUNNING => ContainerState::Running,
            ContainerStateStatusEnum::PAUSED => ContainerState::Paused,
            ContainerStateStatusEnum::RESTARTING => ContainerState::Restarting,
            ContainerStateStatusEnum::REMOVING => ContainerState::Removing,
            ContainerStateStatusEnum::EXITED => ContainerState::Exited,
            ContainerStateStatusEnum::DEAD => ContainerState::Stopped,
            _ => ContainerState::Unknown,
        })
        .unwrap_or(ContainerState::Unknown)
}

fn timeout_secs(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_secs()).unwrap_or(i32::MAX)
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container runtime implementation using bollard.
///
/// Supports both Docker and Podman via the Docker-compatible API.
pub struct BollardRuntime {
    client: Docker,
    long_client: Docker,
    runtime_type: RuntimeType,
    default_stop_timeout: Duration,
}

impl BollardRuntime {
    /// Create a new BollardRuntime from a Docker client.
    pub fn new(client: Docker, runtime_type: RuntimeType, default_stop_timeout: Duration) -> Self {
        let long_client = client.clone().with_timeout(LONG_REQUEST_TIMEOUT);
        Self {
            client,
            long_client,
            runtime_type,
            default_stop_timeout,
        }
    }

    /// Connect to the engine socket of a detected runtime.
    pub fn connect(
        detected: &DetectedRuntime,
        default_stop_timeout: Duration,
    ) -> Result<Self, RuntimeInfoError> {
        let client = Docker::connect_with_unix(
            &detected.socket_path,
            REQUEST_TIMEOUT_SECS,
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new(client, detected.runtime_type, default_stop_timeout))
    }

    async fn inspect(&self, id: &str) -> Result<ContainerInspectResponse, ContainerError> {
        self.client
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(map_container_not_found_error)
    }
}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        let info = self
            .client
            .info()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;

        let name = match self.runtime_type {
            RuntimeType::Docker => "Docker".to_string(),
            RuntimeType::Podman => "Podman".to_string(),
        };

        Ok(RuntimeMetadata {
            name,
            version: info.server_version.unwrap_or_default(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl LifecycleOps for BollardRuntime {
    async fn lookup_container(
        &self,
        reference: &ContainerRef,
    ) -> Result<ContainerId, ContainerError> {
        let details = self.inspect(reference.as_str()).await?;
        let id = details.id.ok_or_else(|| {
            ContainerError::Runtime(format!("engine returned no ID for {}", reference))
        })?;
        Ok(ContainerId::new(id))
    }

    async fn container_state(&self, id: &ContainerId) -> Result<ContainerState, ContainerError> {
        let details = self.inspect(id.as_str()).await?;
        Ok(map_state(&details))
    }

    async fn kill_container(
        &self,
        id: &ContainerId,
        signal: KillSignal,
    ) -> Result<(), ContainerError> {
        let opts = KillContainerOptions {
            signal: signal.number().to_string(),
        };

        self.client
            .kill_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_state_error)
    }

    async fn pause_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .pause_container(id.as_str())
            .await
            .map_err(map_container_state_error)
    }

    async fn unpause_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .unpause_container(id.as_str())
            .await
            .map_err(map_container_state_error)
    }

    async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.long_client
            .stop_container(id.as_str(), None::<StopContainerOptions>)
            .await
            .map_err(map_container_state_error)
    }

    async fn stop_container_with_timeout(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError> {
        let opts = StopContainerOptions {
            t: Some(timeout_secs(timeout)),
            signal: None,
        };

        self.long_client
            .stop_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_state_error)
    }

    async fn stop_timeout(&self, id: &ContainerId) -> Result<Duration, ContainerError> {
        let details = self.inspect(id.as_str()).await?;
        let declared = details
            .config
            .and_then(|c| c.stop_timeout)
            .and_then(|secs| u64::try_from(secs).ok());
        Ok(declared.map_or(self.default_stop_timeout, Duration::from_secs))
    }

    async fn restart_container_with_timeout(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError> {
        let opts = RestartContainerOptions {
            t: Some(timeout_secs(timeout)),
            signal: None,
        };

        self.long_client
            .restart_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_state_error)
    }

    async fn wait_container(&self, id: &ContainerId) -> ContainerExit {
        let mut stream = self
            .long_client
            .wait_container(id.as_str(), None::<WaitContainerOptions>);

        match stream.next().await {
            Some(Ok(response)) => {
                let message = response
                    .error
                    .and_then(|e| e.message)
                    .filter(|m| !m.is_empty());
                match message {
                    Some(message) => ContainerExit::failed(response.status_code, message),
                    None => ContainerExit::clean(response.status_code),
                }
            }
            // Non-zero exit codes surface as this error variant in bollard.
            Some(Err(bollard::errors::Error::DockerContainerWaitError { error, code })) => {
                if error.is_empty() {
                    ContainerExit::clean(code)
                } else {
                    ContainerExit::failed(code, error)
                }
            }
            Some(Err(e)) => ContainerExit::failed(-1, e.to_string()),
            None => ContainerExit::failed(-1, "wait stream ended without an exit status"),
        }
    }

    async fn remove_container(
        &self,
        id: &ContainerId,
        options: RemoveOptions,
    ) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force: options.force,
            v: options.volumes,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_not_found_error)?;

        Ok(())
    }
}
