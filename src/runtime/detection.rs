// ABOUTME: Runtime detection logic for the local host.
// ABOUTME: Checks for Podman sockets first, then Docker.

use super::types::{DetectedRuntime, RuntimeConfig, RuntimeType};
use std::path::Path;

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked Podman and Docker sockets)")]
    NoRuntimeFound,
}

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Detect a container runtime on the local system.
///
/// Detection order:
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
/// 3. Docker socket (`/var/run/docker.sock`)
pub fn detect_local() -> Result<DetectedRuntime, DetectionError> {
    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless_socket).exists() {
            return Ok(DetectedRuntime {
                runtime_type: RuntimeType::Podman,
                socket_path: rootless_socket,
            });
        }
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(DetectedRuntime {
            runtime_type: RuntimeType::Podman,
            socket_path: ROOTFUL_PODMAN.to_string(),
        });
    }

    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(DetectedRuntime {
            runtime_type: RuntimeType::Docker,
            socket_path: DOCKER_SOCKET.to_string(),
        });
    }

    Err(DetectionError::NoRuntimeFound)
}

/// Pick the runtime to connect to.
///
/// An explicit `runtime` in config wins, with `socket` defaulting to that
/// runtime's well-known path. An explicit `socket` alone is assumed to speak
/// the Docker API. Otherwise falls back to [`detect_local`].
pub fn resolve_runtime(config: &RuntimeConfig) -> Result<DetectedRuntime, DetectionError> {
    match (config.runtime, &config.socket) {
        (Some(runtime_type), socket) => Ok(DetectedRuntime {
            runtime_type,
            socket_path: socket
                .clone()
                .unwrap_or_else(|| default_socket_path(runtime_type)),
        }),
        (None, Some(socket)) => Ok(DetectedRuntime {
            runtime_type: RuntimeType::Docker,
            socket_path: socket.clone(),
        }),
        (None, None) => detect_local(),
    }
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn default_socket_path(runtime: RuntimeType) -> String {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET.to_string(),
        RuntimeType::Podman => ROOTFUL_PODMAN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_runtime_uses_default_socket() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Podman),
            ..Default::default()
        };
        let detected = resolve_runtime(&config).unwrap();
        assert_eq!(detected.runtime_type, RuntimeType::Podman);
        assert_eq!(detected.socket_path, ROOTFUL_PODMAN);
    }

    #[test]
    fn explicit_socket_overrides_default() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Docker),
            socket: Some("/tmp/engine.sock".to_string()),
            ..Default::default()
        };
        let detected = resolve_runtime(&config).unwrap();
        assert_eq!(detected.socket_path, "/tmp/engine.sock");
    }

    #[test]
    fn bare_socket_assumes_docker_api() {
        let config = RuntimeConfig {
            socket: Some("/tmp/engine.sock".to_string()),
            ..Default::default()
        };
        let detected = resolve_runtime(&config).unwrap();
        assert_eq!(detected.runtime_type, RuntimeType::Docker);
    }
}
