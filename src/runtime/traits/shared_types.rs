// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: ContainerState, ContainerExit, RemoveOptions, RuntimeMetadata.

use std::fmt;

/// Lifecycle state as reported by the runtime.
///
/// Read-only from the dispatcher's point of view and read at most once per
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Stopped,
    Exited,
    Unknown,
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Stopped => "stopped",
            ContainerState::Exited => "exited",
            ContainerState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Outcome of waiting on a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerExit {
    /// Exit code of the main process, or -1 if it could not be determined.
    pub status_code: i64,
    /// Error reported by the runtime while waiting, if any.
    pub error: Option<String>,
}

impl ContainerExit {
    pub fn clean(status_code: i64) -> Self {
        Self {
            status_code,
            error: None,
        }
    }

    pub fn failed(status_code: i64, error: impl Into<String>) -> Self {
        Self {
            status_code,
            error: Some(error.into()),
        }
    }
}

/// Flags for container removal. Neither affects legality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Kill a running container before removing it.
    pub force: bool,
    /// Remove anonymous volumes attached to the container.
    pub volumes: bool,
}

/// Runtime metadata.
#[derive(Debug, Clone)]
pub struct RuntimeMetadata {
    /// Runtime name (e.g., "Docker", "Podman").
    pub name: String,
    /// Runtime version.
    pub version: String,
    /// API version.
    pub api_version: String,
    /// Operating system.
    pub os: String,
    /// Architecture.
    pub arch: String,
}
