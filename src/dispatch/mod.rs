// ABOUTME: Lifecycle dispatcher mapping container requests onto runtime operations.
// ABOUTME: Resolves the reference, gates on state, parses parameters, calls once.

mod error;
mod gate;
mod params;
mod reply;

pub use error::{ApiError, BoxError, ErrorResponse, Result};
pub use gate::{Gate, Operation, gate};
pub use params::{ParamError, ParseBoolError, QueryParams, TimeoutError};
pub use reply::{Reply, WaitBody, WaitError};

use crate::runtime::{ContainerError, LifecycleOps, RemoveOptions};
use crate::types::{ContainerId, ContainerRef};
use axum::http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Action segment of `/containers/{name}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// The per-container JSON resource; only DELETE is implemented.
    Json,
    Kill,
    Pause,
    Unpause,
    Restart,
    Stop,
    Wait,
    Rename,
}

impl Action {
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "json" => Some(Action::Json),
            "kill" => Some(Action::Kill),
            "pause" => Some(Action::Pause),
            "unpause" => Some(Action::Unpause),
            "restart" => Some(Action::Restart),
            "stop" => Some(Action::Stop),
            "wait" => Some(Action::Wait),
            "rename" => Some(Action::Rename),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Json => "json",
            Action::Kill => "kill",
            Action::Pause => "pause",
            Action::Unpause => "unpause",
            Action::Restart => "restart",
            Action::Stop => "stop",
            Action::Wait => "wait",
            Action::Rename => "rename",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed request addressed to one container.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub method: Method,
    pub reference: ContainerRef,
    pub action: Action,
    pub query: QueryParams,
}

/// Handles one request start to finish against a [`LifecycleOps`] runtime.
///
/// Holds no per-request or per-container state: container state is read at
/// most once per request and each request makes at most one mutating runtime
/// call. Failures are terminal for the request; nothing is retried.
pub struct Dispatcher<R: ?Sized> {
    runtime: Arc<R>,
}

impl<R: ?Sized> Clone for Dispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl<R: LifecycleOps + ?Sized> Dispatcher<R> {
    pub fn new(runtime: Arc<R>) -> Self {
        Self { runtime }
    }

    /// Route a parsed request to its operation.
    pub async fn dispatch(&self, request: OperationRequest) -> Result<Reply> {
        let OperationRequest {
            method,
            reference,
            action,
            query,
        } = request;

        if action != Action::Json && method != Method::POST {
            return Err(ApiError::MethodNotAllowed {
                message: format!(
                    "{} is not allowed for /containers/{}/{}",
                    method, reference, action
                ),
            });
        }

        match action {
            Action::Json => self.container_resource(&method, &reference, &query).await,
            Action::Kill => self.kill(&reference, &query).await,
            Action::Pause => self.pause(&reference).await,
            Action::Unpause => self.unpause(&reference).await,
            Action::Restart => self.restart(&reference, &query).await,
            Action::Stop => self.stop(&reference, &query).await,
            Action::Wait => self.wait(&reference).await,
            Action::Rename => Err(self.rename(&reference)),
        }
    }

    /// `GET /containers/`: listing is not part of this API surface.
    pub fn list(&self) -> ApiError {
        ApiError::not_found("page not found")
    }

    /// `/containers/{name}/rename` is answered with a fixed refusal.
    pub fn rename(&self, reference: &ContainerRef) -> ApiError {
        ApiError::NotImplemented {
            message: format!(
                "API endpoint is not supported: /containers/{}/rename",
                reference
            ),
        }
    }

    /// `/containers/{name}/json`: DELETE removes, every other verb is a 500.
    pub async fn container_resource(
        &self,
        method: &Method,
        reference: &ContainerRef,
        query: &QueryParams,
    ) -> Result<Reply> {
        let id = self.resolve(reference, || "no such container".to_string()).await?;

        if *method != Method::DELETE {
            return Err(ApiError::Internal {
                message: format!("{} is not implemented for containers", method),
                source: None,
            });
        }

        self.remove_resolved(reference, &id, query).await
    }

    /// Remove a container, honoring `force` and `v`. `link` is always refused.
    pub async fn remove(&self, reference: &ContainerRef, query: &QueryParams) -> Result<Reply> {
        let id = self.resolve_named(reference).await?;
        self.remove_resolved(reference, &id, query).await
    }

    async fn remove_resolved(
        &self,
        reference: &ContainerRef,
        id: &ContainerId,
        query: &QueryParams,
    ) -> Result<Reply> {
        let options = RemoveOptions {
            force: params::bool_param(query, "force")?,
            volumes: params::bool_param(query, "v")?,
        };
        params::reject_param(query, "DELETE", "link")?;

        self.runtime
            .remove_container(id, options)
            .await
            .map_err(|e| {
                ApiError::internal(format!("unable to remove container {}", reference), e)
            })?;

        info!(
            container = %reference,
            id = id.short(),
            force = options.force,
            volumes = options.volumes,
            "removed container"
        );
        Ok(Reply::NoContent)
    }

    /// Send a signal (default SIGKILL) to a running container.
    pub async fn kill(&self, reference: &ContainerRef, query: &QueryParams) -> Result<Reply> {
        let id = self.resolve_named(reference).await?;
        self.check_gate(Operation::Kill, reference, &id).await?;

        let signal = params::signal_param(query)?;

        self.runtime
            .kill_container(&id, signal)
            .await
            .map_err(|e| {
                ApiError::internal(format!("unable to kill container {}", reference), e)
            })?;

        info!(
            container = %reference,
            id = id.short(),
            signal = %signal,
            "killed container"
        );
        Ok(Reply::NoContent)
    }

    /// Pause unconditionally; the runtime tolerates a repeated pause.
    pub async fn pause(&self, reference: &ContainerRef) -> Result<Reply> {
        let id = self.resolve_named(reference).await?;

        self.runtime
            .pause_container(&id)
            .await
            .map_err(|e| {
                ApiError::internal(format!("unable to pause container {}", reference), e)
            })?;

        info!(container = %reference, id = id.short(), "paused container");
        Ok(Reply::NoContent)
    }

    /// Unpause unconditionally.
    pub async fn unpause(&self, reference: &ContainerRef) -> Result<Reply> {
        let id = self.resolve_named(reference).await?;

        self.runtime
            .unpause_container(&id)
            .await
            .map_err(|e| {
                ApiError::internal(format!("unable to unpause container {}", reference), e)
            })?;

        info!(container = %reference, id = id.short(), "unpaused container");
        Ok(Reply::NoContent)
    }

    /// Stop a running container. Without `t` the runtime's own default
    /// timeout applies; a stopped container answers 304.
    pub async fn stop(&self, reference: &ContainerRef, query: &QueryParams) -> Result<Reply> {
        let id = self.resolve_named(reference).await?;
        self.check_gate(Operation::Stop, reference, &id).await?;

        let result = match params::timeout_param(query)? {
            Some(timeout) => self.runtime.stop_container_with_timeout(&id, timeout).await,
            None => self.runtime.stop_container(&id).await,
        };
        result.map_err(|e| ApiError::internal(format!("failed to stop {}", reference), e))?;

        info!(container = %reference, id = id.short(), "stopped container");
        Ok(Reply::NoContent)
    }

    /// Restart a running container, with `t` or the container's stop timeout.
    pub async fn restart(&self, reference: &ContainerRef, query: &QueryParams) -> Result<Reply> {
        let id = self.resolve_named(reference).await?;
        self.check_gate(Operation::Restart, reference, &id).await?;

        let timeout = match params::timeout_param(query)? {
            Some(timeout) => timeout,
            None => self.runtime.stop_timeout(&id).await.map_err(|e| {
                ApiError::internal(format!("unable to get stop timeout for {}", reference), e)
            })?,
        };

        self.runtime
            .restart_container_with_timeout(&id, timeout)
            .await
            .map_err(|e| {
                ApiError::internal(format!("unable to restart container {}", reference), e)
            })?;

        info!(
            container = %reference,
            id = id.short(),
            timeout_secs = timeout.as_secs(),
            "restarted container"
        );
        Ok(Reply::NoContent)
    }

    /// Block until the container exits and report its status.
    pub async fn wait(&self, reference: &ContainerRef) -> Result<Reply> {
        let id = self.resolve_named(reference).await?;

        debug!(container = %reference, id = id.short(), "waiting for container");
        let exit = self.runtime.wait_container(&id).await;
        debug!(
            container = %reference,
            status_code = exit.status_code,
            error = exit.error.as_deref().unwrap_or(""),
            "container exited"
        );

        Ok(Reply::Wait(WaitBody::from(exit)))
    }

    async fn resolve_named(&self, reference: &ContainerRef) -> Result<ContainerId> {
        self.resolve(reference, || format!("No such container: {}", reference))
            .await
    }

    async fn resolve(
        &self,
        reference: &ContainerRef,
        not_found: impl FnOnce() -> String,
    ) -> Result<ContainerId> {
        match self.runtime.lookup_container(reference).await {
            Ok(id) => {
                debug!(container = %reference, id = id.short(), "resolved container");
                Ok(id)
            }
            Err(source @ ContainerError::NotFound(_)) => Err(ApiError::NotFound {
                message: not_found(),
                source: Some(source),
            }),
            Err(e) => Err(ApiError::internal(
                format!("unable to look up container {}", reference),
                e,
            )),
        }
    }

    /// Read state once and apply the legality table for `operation`.
    async fn check_gate(
        &self,
        operation: Operation,
        reference: &ContainerRef,
        id: &ContainerId,
    ) -> Result<()> {
        let state = self.runtime.container_state(id).await.map_err(|e| {
            ApiError::internal(format!("unable to get state for {}", reference), e)
        })?;

        match gate(operation, state) {
            Gate::Proceed => Ok(()),
            Gate::Conflict => Err(ApiError::Conflict {
                message: format!("Container {} is not running", reference),
            }),
            Gate::NotModified => Err(ApiError::NotModified {
                message: format!("container {} is already stopped", reference),
            }),
        }
    }
}
