// ABOUTME: State-dependent legality table for lifecycle operations.
// ABOUTME: One explicit match decides whether an operation may proceed.

use crate::runtime::ContainerState;
use std::fmt;

/// Lifecycle operations the dispatcher can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Kill,
    Stop,
    Restart,
    Pause,
    Unpause,
    Wait,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Kill => "kill",
            Operation::Stop => "stop",
            Operation::Restart => "restart",
            Operation::Pause => "pause",
            Operation::Unpause => "unpause",
            Operation::Wait => "wait",
            Operation::Remove => "remove",
        };
        f.write_str(s)
    }
}

/// Verdict of the legality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Invoke the runtime.
    Proceed,
    /// Illegal transition; answer 409 without touching the runtime.
    Conflict,
    /// Already satisfied; answer 304 without touching the runtime.
    NotModified,
}

/// Decide whether `operation` may run against a container in `state`.
///
/// Pause and unpause pass through unconditionally because the runtime
/// tolerates repeating them. Restart on a stopped container answers 409,
/// which matches Docker's observed behavior rather than its published API.
pub fn gate(operation: Operation, state: ContainerState) -> Gate {
    use ContainerState::{Exited, Stopped};

    match (operation, state) {
        (Operation::Kill, Stopped | Exited) => Gate::Conflict,
        (Operation::Restart, Stopped | Exited) => Gate::Conflict,
        (Operation::Stop, Stopped | Exited) => Gate::NotModified,
        (Operation::Kill | Operation::Restart | Operation::Stop, _) => Gate::Proceed,
        (Operation::Pause | Operation::Unpause | Operation::Wait | Operation::Remove, _) => {
            Gate::Proceed
        }
    }
}
