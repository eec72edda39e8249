// ABOUTME: Capability traits the lifecycle dispatcher consumes from a runtime.
// ABOUTME: Defines LifecycleOps and RuntimeInfo plus their shared types.

mod lifecycle;
mod runtime_info;
mod shared_types;

pub use lifecycle::{ContainerError, LifecycleOps};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;
