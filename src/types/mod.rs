// ABOUTME: Validated domain types for container addressing.
// ABOUTME: Separates client-supplied references from runtime-resolved IDs.

mod container_ref;
mod id;

pub use container_ref::{ContainerRef, ContainerRefError};
pub use id::ContainerId;
