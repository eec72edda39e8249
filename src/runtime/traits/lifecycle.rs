// ABOUTME: Container lifecycle trait consumed by the dispatcher.
// ABOUTME: Lookup, state query, and one method per runtime operation.

use super::shared_types::{ContainerExit, ContainerState, RemoveOptions};
use crate::types::{ContainerId, ContainerRef};
use crate::signal::KillSignal;
use async_trait::async_trait;
use std::time::Duration;

/// Narrow capability interface over a container engine.
///
/// Implemented by [`BollardRuntime`](crate::runtime::BollardRuntime) and by
/// test fakes. Implementations have the final say on legality; the
/// dispatcher's state gate only rejects what the API contract requires.
#[async_trait]
pub trait LifecycleOps: Send + Sync {
    /// Resolve a name or ID prefix to exactly one container.
    async fn lookup_container(
        &self,
        reference: &ContainerRef,
    ) -> Result<ContainerId, ContainerError>;

    /// Current lifecycle state.
    async fn container_state(&self, id: &ContainerId) -> Result<ContainerState, ContainerError>;

    /// Deliver a signal to the container's main process.
    async fn kill_container(
        &self,
        id: &ContainerId,
        signal: KillSignal,
    ) -> Result<(), ContainerError>;

    async fn pause_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    async fn unpause_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Stop using the container's configured stop timeout.
    async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Stop, killing the container if it outlives `timeout`.
    async fn stop_container_with_timeout(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError>;

    /// The container's configured stop timeout.
    async fn stop_timeout(&self, id: &ContainerId) -> Result<Duration, ContainerError>;

    async fn restart_container_with_timeout(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError>;

    /// Block until the container exits.
    ///
    /// Never fails outright: wait errors are reported inside
    /// [`ContainerExit::error`] alongside whatever exit code is known.
    async fn wait_container(&self, id: &ContainerId) -> ContainerExit;

    async fn remove_container(
        &self,
        id: &ContainerId,
        options: RemoveOptions,
    ) -> Result<(), ContainerError>;
}

/// Errors from container lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("no such container: {0}")]
    NotFound(String),

    #[error("container not running: {0}")]
    NotRunning(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
