// ABOUTME: Library root for dockward - a Docker-compatible container lifecycle shim.
// ABOUTME: The main binary is in main.rs.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod runtime;
pub mod server;
pub mod signal;
pub mod types;
