// ABOUTME: Success replies produced by the dispatcher.
// ABOUTME: Either an empty 204 or the wait envelope with exit status.

use crate::runtime::ContainerExit;
use serde::{Deserialize, Serialize};

/// Successful outcome of a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 204 with an empty body.
    NoContent,
    /// 200 with the wait envelope.
    Wait(WaitBody),
}

/// Body of `POST /containers/{name}/wait`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WaitBody {
    pub status_code: i64,
    pub error: WaitError,
}

/// Error member of the wait body; `message` is empty on a clean exit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WaitError {
    pub message: String,
}

impl From<ContainerExit> for WaitBody {
    fn from(exit: ContainerExit) -> Self {
        WaitBody {
            status_code: exit.status_code,
            error: WaitError {
                message: exit.error.unwrap_or_default(),
            },
        }
    }
}
