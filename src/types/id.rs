// ABOUTME: Runtime-resolved container identifier.
// ABOUTME: Only produced by a successful lookup, never parsed from client input.

use std::fmt;

/// Full container ID as reported by the runtime.
///
/// A `ContainerId` is the handle the dispatcher works with after lookup.
/// It denotes exactly one runtime-managed container for the lifetime of a
/// request. There is no `Deserialize`, so client input cannot
/// masquerade as a resolved ID.
#[must_use = "IDs reference containers and should not be ignored"]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Twelve-character short form used in log output.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(12)
            .map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
