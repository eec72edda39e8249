// ABOUTME: Listener configuration for the API server.
// ABOUTME: Either a Unix socket path or a TCP socket address.

use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Where the API server accepts connections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenConfig {
    /// Unix domain socket, the usual transport for Docker clients.
    Socket(PathBuf),
    /// Plain TCP; no TLS is offered.
    Tcp(SocketAddr),
}

impl Default for ListenConfig {
    fn default() -> Self {
        ListenConfig::Socket(default_socket_path())
    }
}

impl fmt::Display for ListenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenConfig::Socket(path) => write!(f, "unix://{}", path.display()),
            ListenConfig::Tcp(addr) => write!(f, "tcp://{}", addr),
        }
    }
}

/// `$XDG_RUNTIME_DIR/dockward.sock`, or `/tmp/dockward.sock` without one.
pub fn default_socket_path() -> PathBuf {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("dockward.sock")
}
