//! Events - ドメインイベント
//!
//! 1 回の dispatch につき `DispatchSubmitted` と、
//! `DispatchSucceeded` / `DispatchFailed` のどちらか 1 つが発生します。

use serde::Serialize;

use super::errors::ErrorKind;
use super::ids::DispatchId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    DispatchSubmitted {
        dispatch_id: DispatchId,
        bucket: String,
        key: String,
    },
    DispatchSucceeded {
        dispatch_id: DispatchId,
        task_arns: Vec<String>,
    },
    DispatchFailed {
        dispatch_id: DispatchId,
        kind: ErrorKind,
        code: Option<String>,
        message: String,
    },
}

impl DomainEvent {
    pub fn dispatch_id(&self) -> DispatchId {
        match self {
            Self::DispatchSubmitted { dispatch_id, .. }
            | Self::DispatchSucceeded { dispatch_id, .. }
            | Self::DispatchFailed { dispatch_id, .. } => *dispatch_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DispatchSubmitted { .. } => "dispatch_submitted",
            Self::DispatchSucceeded { .. } => "dispatch_succeeded",
            Self::DispatchFailed { .. } => "dispatch_failed",
        }
    }
}
