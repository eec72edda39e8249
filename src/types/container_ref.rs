// ABOUTME: Client-supplied container reference (name or ID prefix).
// ABOUTME: Percent-decoded from the request path; may contain slashes.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerRefError {
    #[error("container reference cannot be empty")]
    Empty,

    #[error("container reference is not valid percent-encoded UTF-8: {0}")]
    InvalidEncoding(String),
}

/// A name or ID prefix as the client wrote it.
///
/// Resolution to a [`ContainerId`](super::ContainerId) is the runtime's job;
/// this type only guarantees the reference is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef(String);

impl ContainerRef {
    pub fn new(value: &str) -> Result<Self, ContainerRefError> {
        if value.is_empty() {
            return Err(ContainerRefError::Empty);
        }
        Ok(Self(value.to_string()))
    }

    /// Decode a raw path segment such as `my%2Fapp`.
    pub fn from_encoded(raw: &str) -> Result<Self, ContainerRefError> {
        let decoded = urlencoding::decode(raw)
            .map_err(|e| ContainerRefError::InvalidEncoding(e.to_string()))?;
        Self::new(&decoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
