// ABOUTME: Container runtime collaborator: traits, detection, and the bollard backend.
// ABOUTME: Auto-detects a local Docker-compatible socket or uses explicit config.

mod bollard;
mod detection;
mod error;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local, resolve_runtime};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::*;
pub use types::{DetectedRuntime, RuntimeConfig, RuntimeType};
